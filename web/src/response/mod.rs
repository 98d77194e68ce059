pub(crate) mod webhook;
