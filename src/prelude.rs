pub use crate::commands::*;
pub use crate::ec2::*;
pub use crate::environment::Environment;
pub use anyhow::{anyhow, bail, Context, Result};
pub use colored::Colorize;
pub use std::io::Write;

#[cfg(test)]
pub use indoc::indoc;

#[cfg(test)]
pub use pretty_assertions as pa;
