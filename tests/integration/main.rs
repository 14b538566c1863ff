//! Integration tests driving the services over in-memory stores.

mod helpers;

mod concurrency_test;
mod path_test;
mod project_test;
mod tree_test;
