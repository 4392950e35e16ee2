pub mod apps;
pub mod db;
pub mod tasks;
