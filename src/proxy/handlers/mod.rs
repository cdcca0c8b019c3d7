// Handlers module - API endpoint handlers

pub mod branches;
pub mod docs;
