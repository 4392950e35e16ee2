pub mod bootstrap_admin;
pub mod login;
pub mod resolve_requestor;
