use crate::item::Item;
use crate::model::{Category, DEFAULT_PRIORITY};
use crate::notice::Notice;

pub const HOME_TITLE: &str = "Must Watch";
pub const LIST_TITLE: &str = "Wish List";

/// Data behind the list page. `selected` switches the form to edit mode.
pub struct ListPage<'a> {
    pub title: &'a str,
    pub items: &'a [Item],
    pub selected: Option<&'a Item>,
    pub notice: Option<&'a Notice>,
}

pub fn escape_html(value: &str) -> String {
    let mut output = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#39;"),
            _ => output.push(ch),
        }
    }
    output
}

pub fn render_home(total: u64, notice: Option<&Notice>) -> String {
    let mut body = String::new();
    body.push_str(&format!("<h1>{}</h1>\n", escape_html(HOME_TITLE)));
    push_notice(&mut body, notice);
    let noun = if total == 1 { "item" } else { "items" };
    body.push_str(&format!(
        "<p class=\"total\">{total} {noun} on your list.</p>\n"
    ));
    body.push_str("<p><a href=\"/items\">Open the list</a></p>\n");
    layout(HOME_TITLE, &body)
}

pub fn render_list(page: &ListPage<'_>) -> String {
    let mut body = String::new();
    body.push_str(&format!("<h1>{}</h1>\n", escape_html(page.title)));
    push_notice(&mut body, page.notice);
    push_form(&mut body, page.selected);
    push_table(&mut body, page.items);
    layout(page.title, &body)
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n</head>\n<body>\n\
         <nav><a href=\"/\">Home</a> | <a href=\"/items\">List</a></nav>\n\
         {body}</body>\n</html>\n",
        escape_html(title)
    )
}

fn push_notice(output: &mut String, notice: Option<&Notice>) {
    if let Some(notice) = notice {
        output.push_str(&format!(
            "<div class=\"notice notice-{}\">{}</div>\n",
            notice.level.as_str(),
            escape_html(&notice.message)
        ));
    }
}

fn push_form(output: &mut String, selected: Option<&Item>) {
    let action = match selected.and_then(|item| item.id) {
        Some(id) => format!("/edit/{id}"),
        None => "/items".to_string(),
    };
    let title = selected.map(|item| item.title.as_str()).unwrap_or("");
    let deadline = selected
        .and_then(|item| item.deadline.as_deref())
        .unwrap_or("");
    let category = selected
        .map(|item| item.category.as_str())
        .unwrap_or(Category::General.as_str());
    let priority = selected
        .map(|item| item.priority)
        .unwrap_or(DEFAULT_PRIORITY);

    output.push_str(&format!(
        "<form method=\"post\" action=\"{}\">\n",
        escape_html(&action)
    ));
    output.push_str(&format!(
        "<label>Title <input type=\"text\" name=\"title\" value=\"{}\" required></label>\n",
        escape_html(title)
    ));
    output.push_str(&format!(
        "<label>Deadline <input type=\"date\" name=\"deadline\" value=\"{}\"></label>\n",
        escape_html(deadline)
    ));
    output.push_str("<label>Category <select name=\"category\">\n");
    for option in category_options(category) {
        let marker = if option == category { " selected" } else { "" };
        output.push_str(&format!(
            "<option value=\"{0}\"{marker}>{0}</option>\n",
            escape_html(option)
        ));
    }
    output.push_str("</select></label>\n");
    output.push_str(&format!(
        "<label>Priority <input type=\"number\" name=\"priority\" value=\"{priority}\"></label>\n"
    ));
    if selected.is_some() {
        output.push_str("<button type=\"submit\">Save</button> <a href=\"/items\">Cancel</a>\n");
    } else {
        output.push_str("<button type=\"submit\">Add</button>\n");
    }
    output.push_str("</form>\n");
}

/// Suggested categories, plus `current` when it falls outside the set.
fn category_options(current: &str) -> Vec<&str> {
    let mut options: Vec<&str> = Category::ALL.iter().map(Category::as_str).collect();
    if !options.contains(&current) {
        options.push(current);
    }
    options
}

fn push_table(output: &mut String, items: &[Item]) {
    output.push_str("<table>\n<thead><tr><th>Title</th><th>Deadline</th><th>Category</th><th>Priority</th><th></th></tr></thead>\n<tbody>\n");
    if items.is_empty() {
        output.push_str("<tr><td colspan=\"5\">Nothing on the list yet.</td></tr>\n");
    }
    for item in items {
        let actions = match item.id {
            Some(id) => {
                format!("<a href=\"/edit/{id}\">Edit</a> <a href=\"/delete/{id}\">Delete</a>")
            }
            None => String::new(),
        };
        output.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{actions}</td></tr>\n",
            escape_html(&item.title),
            escape_html(item.deadline.as_deref().unwrap_or("-")),
            escape_html(&item.category),
            item.priority,
        ));
    }
    output.push_str("</tbody>\n</table>\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: i64, title: &str) -> Item {
        let mut item = Item::new(title);
        item.id = Some(id);
        item
    }

    #[test]
    fn escape_html_covers_markup_characters() {
        assert_eq!(
            escape_html("<a href=\"x\">Tom & Jerry's</a>"),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn home_shows_total() {
        let html = render_home(3, None);
        assert!(html.contains("<h1>Must Watch</h1>"));
        assert!(html.contains("3 items on your list."));
        assert!(render_home(1, None).contains("1 item on your list."));
    }

    #[test]
    fn list_renders_create_form_and_rows() {
        let items = vec![sample(2, "<script>"), sample(1, "Dune")];
        let html = render_list(&ListPage {
            title: LIST_TITLE,
            items: &items,
            selected: None,
            notice: None,
        });
        assert!(html.contains("action=\"/items\""));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<td><script>"));
        assert!(html.contains("href=\"/delete/1\""));
        assert!(html.contains("href=\"/edit/2\""));
        for category in Category::ALL {
            assert!(html.contains(&format!("<option value=\"{}\"", category.as_str())));
        }
    }

    #[test]
    fn list_shows_placeholder_when_empty() {
        let html = render_list(&ListPage {
            title: LIST_TITLE,
            items: &[],
            selected: None,
            notice: None,
        });
        assert!(html.contains("Nothing on the list yet."));
    }

    #[test]
    fn edit_form_is_prefilled() {
        let mut item = sample(5, "Arrival");
        item.category = "Podcast".to_string();
        item.deadline = Some("2026-11-30".to_string());
        item.priority = 4;
        let items = vec![item.clone()];
        let html = render_list(&ListPage {
            title: "Editing: Arrival",
            items: &items,
            selected: Some(&item),
            notice: None,
        });
        assert!(html.contains("action=\"/edit/5\""));
        assert!(html.contains("name=\"title\" value=\"Arrival\""));
        assert!(html.contains("value=\"2026-11-30\""));
        assert!(html.contains("<option value=\"Podcast\" selected>"));
        assert!(html.contains("name=\"priority\" value=\"4\""));
        assert!(html.contains(">Cancel</a>"));
    }

    #[test]
    fn notice_is_rendered_with_level() {
        let notice = Notice::error("Title cannot be empty.");
        let html = render_home(0, Some(&notice));
        assert!(html.contains("<div class=\"notice notice-error\">Title cannot be empty.</div>"));
    }
}
