// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

//! Utility for converting nested enum errors into chains of static
//! strings, so that a probe can name a drop reason without paying the
//! `fmt` tax.

use core::fmt;
use core::fmt::Display;
pub use derror_macro::DError;

/// A trait used for walking chains of errors which store useful data in
/// a leaf node.
pub trait DError {
    /// Provide the name of an error's discriminant.
    fn discriminant(&self) -> &'static str;

    /// Provide a reference to the next error in the chain.
    fn child(&self) -> Option<&dyn DError>;

    /// Store data from a leaf error to be bundled with a probe.
    fn leaf_data(&self, _data: &mut [u64]) {}
}

/// The flattened form of a nested error: the discriminant names
/// encountered walking from the root to the leaf, plus the leaf's data.
///
/// Holds at most `L` names. Names beyond that are dropped and `more`
/// is set.
#[derive(Clone, Copy, Debug)]
pub struct LabelChain<const L: usize> {
    len: usize,
    more: bool,
    data: [u64; 2],
    entries: [&'static str; L],
}

/// Signals that a [`LabelChain`] could not hold another name.
#[derive(Clone, Copy, Debug)]
struct LabelChainFull;

impl<const L: usize> LabelChain<L> {
    /// Create storage for at most `L` names.
    const fn new() -> Self {
        Self { len: 0, more: false, data: [0; 2], entries: [""; L] }
    }

    /// Flatten a nested error into a chain of names.
    ///
    /// Returns `Err` holding the truncated chain if `err` is nested
    /// more deeply than `L`.
    pub fn from_err(err: &dyn DError) -> Result<Self, Self> {
        let mut out = Self::new();

        match out.append(err) {
            Ok(()) => Ok(out),
            Err(LabelChainFull) => Err(out),
        }
    }

    /// Push all layers (and the leaf data) of an error into the chain.
    fn append(&mut self, err: &dyn DError) -> Result<(), LabelChainFull> {
        let mut top: Option<&dyn DError> = Some(err);
        while let Some(el) = top {
            self.append_name(el.discriminant())?;
            top = el.child();

            if top.is_none() {
                el.leaf_data(&mut self.data[..]);
            }
        }
        Ok(())
    }

    fn append_name(&mut self, name: &'static str) -> Result<(), LabelChainFull> {
        if self.len >= L {
            self.more = true;
            return Err(LabelChainFull);
        }

        self.entries[self.len] = name;
        self.len += 1;
        Ok(())
    }

    pub fn entries(&self) -> &[&'static str] {
        &self.entries[..self.len]
    }

    /// Data stored by the leaf error.
    pub fn data(&self) -> &[u64] {
        &self.data[..]
    }
}

/// Writes the names joined with `.`, e.g. `TruncatedFrame.Ipv4`.
impl<const L: usize> Display for LabelChain<L> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, name) in self.entries().iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{name}")?;
        }

        if self.more {
            write!(f, ".*")?;
        }

        Ok(())
    }
}
