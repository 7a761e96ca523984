// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! A log buffer in memory, for platforms with no console available to BL31.

use core::{
    cmp::min,
    fmt::{self, Write},
};

/// An in-memory logger with a circular buffer.
///
/// The layout is fixed so that a debugger or a later boot stage can find the log.
#[repr(C)]
pub struct MemoryLogger<const BUFFER_SIZE: usize> {
    /// The position in `buffer` at which to write the next byte.
    next_offset: usize,
    /// The total number of bytes logged since the logger was created. Note that this may
    /// be greater than `BUFFER_SIZE`, so not all the bytes logged may still be available.
    logged_bytes_count: usize,
    buffer: [u8; BUFFER_SIZE],
}

impl<const BUFFER_SIZE: usize> MemoryLogger<BUFFER_SIZE> {
    /// Creates a new in-memory logger with a zeroed-out circular buffer.
    pub const fn new() -> Self {
        Self {
            next_offset: 0,
            logged_bytes_count: 0,
            buffer: [0; BUFFER_SIZE],
        }
    }

    /// Returns how many of the bytes logged so far have been overwritten by newer ones.
    pub fn lost_bytes(&self) -> usize {
        self.logged_bytes_count.saturating_sub(BUFFER_SIZE)
    }

    /// Adds the given bytes to the circular buffer.
    ///
    /// If more bytes are passed than can fit in the buffer at once, then the initial bytes are
    /// ignored.
    fn add_bytes(&mut self, mut bytes: &[u8]) {
        self.logged_bytes_count += bytes.len();
        // If we are given more bytes than we can fit, keep the end.
        if bytes.len() > BUFFER_SIZE {
            bytes = &bytes[bytes.len() - BUFFER_SIZE..];
        }

        let buffer_end_len = min(bytes.len(), BUFFER_SIZE - self.next_offset);
        self.buffer[self.next_offset..self.next_offset + buffer_end_len]
            .copy_from_slice(&bytes[..buffer_end_len]);
        self.buffer[..bytes.len() - buffer_end_len].copy_from_slice(&bytes[buffer_end_len..]);
        self.next_offset = (self.next_offset + bytes.len()) % BUFFER_SIZE;
    }

    /// Rotates the ring buffer so that the oldest byte is at index 0.
    fn shift_to_start(&mut self) {
        if self.logged_bytes_count < BUFFER_SIZE {
            return;
        }

        // self.next_offset points to the oldest byte.
        self.buffer.rotate_left(self.next_offset);
        self.next_offset = 0;
    }

    /// Returns the longest valid UTF-8 suffix of the logged bytes still in the buffer.
    pub fn as_str(&mut self) -> &str {
        self.shift_to_start();

        let mut current = &self.buffer[..min(BUFFER_SIZE, self.logged_bytes_count)];

        // After `shift_to_start` the buffer may start with a partially overwritten UTF-8 character
        // (at most 3 bytes are corrupt). A single call to `str::from_utf8` may identify only a
        // portion of the corrupt sequence, so skip invalid sequences until the rest is valid.
        loop {
            match str::from_utf8(current) {
                Ok(valid_str) => return valid_str,
                Err(e) => match e.error_len() {
                    // The error is at index 0.
                    Some(len) => current = &current[len..],
                    // Only an incomplete character remains at the end.
                    None => return "",
                },
            }
        }
    }
}

impl<const BUFFER_SIZE: usize> Default for MemoryLogger<BUFFER_SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const BUFFER_SIZE: usize> Write for MemoryLogger<BUFFER_SIZE> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.add_bytes(s.as_bytes());
        Ok(())
    }
}
