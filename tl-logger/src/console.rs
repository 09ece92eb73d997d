// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

use crate::fmt::{self, Entry};
use std::io::{self, Write};

#[derive(Debug, Default)]
pub struct Console;

impl Console {
    pub fn write(&self, entry: &Entry) -> io::Result<()> {
        // Format into a buffer first so concurrent lines do not interleave
        let mut line = Vec::with_capacity(256);
        fmt::format(entry, &mut line)?;
        io::stdout().lock().write_all(&line)
    }
}
