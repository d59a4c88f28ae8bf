//! Integration tests over the public pipeline API

mod support;

mod extraction;
mod pipeline;
