//! Pipeline engine orchestrating Perseid candidate propagation.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod module_list;

pub use module_list::ModuleList;
