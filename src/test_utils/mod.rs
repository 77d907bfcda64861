#![allow(missing_docs)]

pub(crate) mod backend;
pub(crate) mod html;
pub(crate) mod http;

pub(crate) use backend::{BackendCall, FakeBackend};
pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_fragment, select_text};
pub(crate) use http::{assert_content_type, assert_status_ok, get_header};
