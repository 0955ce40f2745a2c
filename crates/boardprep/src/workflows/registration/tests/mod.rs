mod common;
mod payload;
mod routing;
