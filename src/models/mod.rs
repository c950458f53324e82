pub mod alert;
pub mod chat;
pub mod customer;
pub mod driver;
pub mod message;
pub mod notification;
pub mod review;
pub mod route;

/// Anything stored in a [`crate::store::table::Table`] is looked up by its string id.
pub trait Identified {
    fn id(&self) -> &str;
}
