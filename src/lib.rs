//! quillpost: the content layer of a server-rendered blog.
//!
//! Page-rendering code builds one [`application::content::ContentClient`] over an
//! [`infra::upstream::HttpPostSource`] and asks it for published posts.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
