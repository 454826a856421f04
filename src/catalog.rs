use crate::types::inventory::{Document, IdsExhausted, Item, next_id};

pub fn add_item(
    document: &mut Document,
    name: &str,
    capacity: u32,
) -> Result<Item, IdsExhausted> {
    let item = Item {
        id: next_id("cascos", document.items.iter().map(|item| item.id))?,
        name: name.to_string(),
        capacity,
        lent: false,
        borrower: None,
    };
    document.items.push(item.clone());
    Ok(item)
}

/// Renames every item with `item_id`. Returns whether one was found.
pub fn rename_item(document: &mut Document, item_id: u32, new_name: &str) -> bool {
    let mut found = false;
    for item in document.items.iter_mut().filter(|item| item.id == item_id) {
        item.name = new_name.to_string();
        found = true;
    }
    found
}

pub fn delete_item(document: &mut Document, item_id: u32) -> bool {
    let before = document.items.len();
    document.items.retain(|item| item.id != item_id);
    document.items.len() != before
}

pub fn list_items(document: &Document) -> &[Item] {
    &document.items
}
