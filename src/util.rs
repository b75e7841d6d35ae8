use crate::item::Item;

fn has_text(value: &Option<String>) -> bool {
    value
        .as_deref()
        .map(|text| !text.trim().is_empty())
        .unwrap_or(false)
}

pub fn format_item_line(item: &Item) -> String {
    let mut output = String::new();
    match item.id {
        Some(id) => output.push_str(&format!("#{id} ")),
        None => output.push_str("#- "),
    }
    output.push_str(&format!(
        "[{}] {} ({})",
        item.priority, item.title, item.category
    ));
    if has_text(&item.deadline) {
        output.push_str(&format!(
            " due {}",
            item.deadline.as_deref().unwrap_or("")
        ));
    }
    output
}

pub fn format_item_list(items: &[Item]) -> String {
    if items.is_empty() {
        return "No items.".to_string();
    }
    items
        .iter()
        .map(format_item_line)
        .collect::<Vec<_>>()
        .join("\n")
}
