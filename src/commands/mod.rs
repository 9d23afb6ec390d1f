pub mod auth;
pub mod db;
pub mod entities;
pub mod exports;
pub mod insights;
pub mod performance;
pub mod settings;
