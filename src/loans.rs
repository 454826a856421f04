use crate::types::inventory::Document;

/// Marks the item as lent to `user_id`, overwriting any previous borrower.
/// The user is not required to exist.
pub fn lend(document: &mut Document, item_id: u32, user_id: u32) -> bool {
    let mut found = false;
    for item in document.items.iter_mut().filter(|item| item.id == item_id) {
        item.lent = true;
        item.borrower = Some(user_id);
        found = true;
    }
    found
}

pub fn return_item(document: &mut Document, item_id: u32) -> bool {
    let mut found = false;
    for item in document.items.iter_mut().filter(|item| item.id == item_id) {
        item.lent = false;
        item.borrower = None;
        found = true;
    }
    found
}
