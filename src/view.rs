//! Server-rendered pages.

use std::fmt::Write;

use crate::model::{TodoItem, User};

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        body
    )
}

pub fn home() -> String {
    page(
        "TODO",
        "<h1>Welcome to the TODO app</h1>\n\
         <p><a href=\"/login\">Log in</a> or <a href=\"/register\">register</a>.</p>",
    )
}

pub fn login() -> String {
    page(
        "Log in",
        "<h1>Log in</h1>\n\
         <form method=\"post\" action=\"/login\">\n\
         <input name=\"username\" placeholder=\"Username\" required>\n\
         <input name=\"password\" type=\"password\" placeholder=\"Password\" required>\n\
         <button type=\"submit\">Log in</button>\n\
         </form>\n\
         <p>No account? <a href=\"/register\">Register</a></p>",
    )
}

pub fn register() -> String {
    page(
        "Register",
        "<h1>Register</h1>\n\
         <form method=\"post\" action=\"/register\">\n\
         <input name=\"username\" placeholder=\"Username\" required>\n\
         <input name=\"password\" type=\"password\" placeholder=\"Password\" required>\n\
         <button type=\"submit\">Register</button>\n\
         </form>",
    )
}

pub fn todos(user: &User, todos: &[TodoItem]) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<h1>{}'s todos</h1>", escape(&user.username));
    body.push_str(
        "<form method=\"post\" action=\"/logout\"><button type=\"submit\">Log out</button></form>\n\
         <form method=\"post\" action=\"/todos/create\">\n\
         <input name=\"title\" placeholder=\"Title\" required>\n\
         <input name=\"description\" placeholder=\"Description\" required>\n\
         <button type=\"submit\">Add</button>\n\
         </form>\n",
    );

    if todos.is_empty() {
        body.push_str("<p>Nothing to do.</p>");
        return page("Todos", &body);
    }

    body.push_str("<ul>\n");
    for todo in todos {
        let title = escape(&todo.title);
        let description = escape(&todo.description);
        let checked = if todo.completed { " checked" } else { "" };
        let _ = write!(
            body,
            "<li class=\"{class}\">\n\
             <form method=\"post\" action=\"/todos/{id}/update\">\n\
             <input name=\"title\" value=\"{title}\" required>\n\
             <input name=\"description\" value=\"{description}\" required>\n\
             <input name=\"completed\" type=\"checkbox\" value=\"true\"{checked}>\n\
             <button type=\"submit\">Save</button>\n\
             </form>\n\
             <form method=\"post\" action=\"/todos/{id}/delete\">\n\
             <button type=\"submit\">Delete</button>\n\
             </form>\n\
             </li>\n",
            class = if todo.completed { "done" } else { "open" },
            id = todo.id,
        );
    }
    body.push_str("</ul>");

    page("Todos", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_user_content() {
        let user = User {
            id: 1,
            username: "<b>alice</b>".into(),
            email: None,
            hashed_password: String::new(),
        };
        let item = TodoItem {
            id: 3,
            title: "a \"quoted\" <script>".into(),
            description: "x & y".into(),
            completed: true,
            owner_id: 1,
        };
        let html = todos(&user, &[item]);
        assert!(html.contains("&lt;b&gt;alice&lt;/b&gt;"));
        assert!(html.contains("a &quot;quoted&quot; &lt;script&gt;"));
        assert!(html.contains("x &amp; y"));
        assert!(html.contains("/todos/3/update"));
        assert!(html.contains(" checked>"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn empty_list() {
        let user = User {
            id: 1,
            username: "alice".into(),
            email: None,
            hashed_password: String::new(),
        };
        assert!(todos(&user, &[]).contains("Nothing to do."));
    }
}
