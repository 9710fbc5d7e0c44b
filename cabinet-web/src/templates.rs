//! HTML pages for the web interface
//!
//! Pages are assembled with [`Markup`], which only accepts literal markup
//! as `&'static str`. Runtime values (usernames, filenames, search
//! queries, error messages) can only be added through [`Markup::text`],
//! which HTML-escapes them. User input therefore never reaches the page
//! as markup.

use axum::response::Html;

const STYLES: &str = r#"
    body {
        font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Arial, sans-serif;
        max-width: 800px;
        margin: 40px auto;
        padding: 0 20px;
        background: #f5f5f5;
        color: #333;
    }
    .container {
        background: white;
        padding: 30px;
        border-radius: 8px;
        box-shadow: 0 2px 4px rgba(0,0,0,0.1);
    }
    h1 { border-bottom: 2px solid #0066cc; padding-bottom: 10px; }
    nav a { margin-right: 15px; }
    .form-group { margin: 15px 0; }
    label { display: block; font-weight: bold; margin-bottom: 5px; }
    input[type="text"], input[type="password"] {
        width: 100%;
        padding: 10px;
        border: 1px solid #ddd;
        border-radius: 4px;
        box-sizing: border-box;
    }
    button {
        background: #0066cc;
        color: white;
        padding: 10px 20px;
        border: none;
        border-radius: 4px;
        cursor: pointer;
    }
    .error {
        color: #d9534f;
        background: #f2dede;
        padding: 10px;
        border-radius: 4px;
        margin: 10px 0;
    }
    .empty { color: #777; font-style: italic; }
"#;

/// HTML buffer that escapes every runtime value
#[derive(Debug, Default)]
pub struct Markup {
    buf: String,
}

impl Markup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends literal markup
    pub fn raw(&mut self, html: &'static str) -> &mut Self {
        self.buf.push_str(html);
        self
    }

    /// Appends a runtime value as escaped text
    ///
    /// Safe in element content and in double-quoted attribute values.
    pub fn text(&mut self, value: &str) -> &mut Self {
        for c in value.chars() {
            match c {
                '&' => self.buf.push_str("&amp;"),
                '<' => self.buf.push_str("&lt;"),
                '>' => self.buf.push_str("&gt;"),
                '"' => self.buf.push_str("&quot;"),
                '\'' => self.buf.push_str("&#x27;"),
                _ => self.buf.push(c),
            }
        }
        self
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

/// Percent-encodes one URL path segment
fn encode_path_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

fn page(title: &'static str, body: impl FnOnce(&mut Markup)) -> Html<String> {
    let mut m = Markup::new();
    m.raw("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>File Cabinet - ")
        .raw(title)
        .raw("</title>\n<style>")
        .raw(STYLES)
        .raw("</style>\n</head>\n<body>\n<div class=\"container\">\n");
    body(&mut m);
    m.raw("\n</div>\n</body>\n</html>\n");
    Html(m.into_string())
}

fn error_banner(m: &mut Markup, error: Option<&str>) {
    if let Some(message) = error {
        m.raw("<div class=\"error\">").text(message).raw("</div>\n");
    }
}

fn file_list(m: &mut Markup, files: &[String], empty: &'static str) {
    if files.is_empty() {
        m.raw("<p class=\"empty\">").raw(empty).raw("</p>\n");
        return;
    }

    m.raw("<ul>\n");
    for name in files {
        m.raw("<li><a href=\"/download/")
            .text(&encode_path_segment(name))
            .raw("\">")
            .text(name)
            .raw("</a></li>\n");
    }
    m.raw("</ul>\n");
}

fn nav(m: &mut Markup) {
    m.raw(
        "<nav><a href=\"/cabinet\">My files</a><a href=\"/upload\">Upload</a>\
         <a href=\"/logout\">Log out</a></nav>\n",
    );
}

/// Landing page for anonymous visitors
pub fn index_page() -> Html<String> {
    page("Welcome", |m| {
        m.raw("<h1>File Cabinet</h1>\n")
            .raw("<p>Store, find, and retrieve your personal documents.</p>\n")
            .raw("<p><a href=\"/login\">Log in</a> or <a href=\"/register\">create an account</a>.</p>\n");
    })
}

/// Registration form, optionally with an error message
pub fn register_page(error: Option<&str>) -> Html<String> {
    page("Register", |m| {
        m.raw("<h1>Create an account</h1>\n");
        error_banner(m, error);
        m.raw(
            r#"<form method="POST" action="/register">
<div class="form-group"><label for="username">Username</label>
<input type="text" id="username" name="username" maxlength="80" required autofocus></div>
<div class="form-group"><label for="password">Password</label>
<input type="password" id="password" name="password" required></div>
<button type="submit">Register</button>
</form>
<p>Already registered? <a href="/login">Log in</a></p>
"#,
        );
    })
}

/// Login form, optionally with an error message
pub fn login_page(error: Option<&str>) -> Html<String> {
    page("Login", |m| {
        m.raw("<h1>Log in</h1>\n");
        error_banner(m, error);
        m.raw(
            r#"<form method="POST" action="/login">
<div class="form-group"><label for="username">Username</label>
<input type="text" id="username" name="username" required autofocus></div>
<div class="form-group"><label for="password">Password</label>
<input type="password" id="password" name="password" required></div>
<button type="submit">Log in</button>
</form>
<p>No account yet? <a href="/register">Register</a></p>
"#,
        );
    })
}

/// The signed-in user's file listing with a search box
pub fn cabinet_page(username: &str, files: &[String]) -> Html<String> {
    page("My files", |m| {
        m.raw("<h1>").text(username).raw("'s cabinet</h1>\n");
        nav(m);
        m.raw(
            r#"<form method="GET" action="/search">
<div class="form-group"><label for="query">Search file contents</label>
<input type="text" id="query" name="query"></div>
<button type="submit">Search</button>
</form>
"#,
        );
        m.raw("<h2>Files</h2>\n");
        file_list(m, files, "No files uploaded yet.");
    })
}

/// Upload form
pub fn upload_page() -> Html<String> {
    page("Upload", |m| {
        m.raw("<h1>Upload a document</h1>\n");
        nav(m);
        m.raw(
            r#"<form method="POST" action="/upload" enctype="multipart/form-data">
<div class="form-group"><label for="document">Document (txt, pdf, png, jpg, jpeg, gif)</label>
<input type="file" id="document" name="document" required></div>
<button type="submit">Upload</button>
</form>
"#,
        );
    })
}

/// Search results; the query is echoed as escaped text
pub fn search_page(query: &str, files: &[String]) -> Html<String> {
    page("Search", |m| {
        m.raw("<h1>Search results</h1>\n");
        nav(m);
        m.raw("<p>Files containing <strong>").text(query).raw("</strong>:</p>\n");
        file_list(m, files, "No matching files.");
    })
}

/// Generic error page
pub fn error_page(title: &'static str, message: &str) -> Html<String> {
    page(title, |m| {
        m.raw("<h1>").raw(title).raw("</h1>\n");
        error_banner(m, Some(message));
        m.raw("<p><a href=\"/\">Back to start</a></p>\n");
    })
}
