pub mod entities;
pub mod form;
pub mod requests;
pub mod responses;
