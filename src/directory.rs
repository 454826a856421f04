use crate::types::inventory::{Document, IdsExhausted, User, next_id};

pub fn add_user(document: &mut Document, name: &str) -> Result<User, IdsExhausted> {
    let user = User {
        id: next_id("usuarios", document.users.iter().map(|user| user.id))?,
        name: name.to_string(),
    };
    document.users.push(user.clone());
    Ok(user)
}

pub fn rename_user(document: &mut Document, user_id: u32, new_name: &str) -> bool {
    let mut found = false;
    for user in document.users.iter_mut().filter(|user| user.id == user_id) {
        user.name = new_name.to_string();
        found = true;
    }
    found
}

/// Removes the user. Items that still name it as borrower are left alone.
pub fn delete_user(document: &mut Document, user_id: u32) -> bool {
    let before = document.users.len();
    document.users.retain(|user| user.id != user_id);
    document.users.len() != before
}

pub fn list_users(document: &Document) -> &[User] {
    &document.users
}

pub fn find_user(document: &Document, user_id: u32) -> Option<&User> {
    document.users.iter().find(|user| user.id == user_id)
}
