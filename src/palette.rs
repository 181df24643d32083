//! Per-instruction color assignment.
//!
//! Every distinct instruction pointer gets its own color for the lifetime of
//! one aggregation pass. The first [`PALETTE`]`.len()` instruction pointers
//! receive the fixed high-contrast palette in order; after that colors are
//! drawn from a seeded RNG.

use crate::color::Rgb;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

/// Fixed, ordered palette of preselected colors.
pub const PALETTE: [Rgb; 42] = [
    Rgb::new(0xFDFEFE),
    Rgb::new(0xECF0F1),
    Rgb::new(0xB3B6B7),
    Rgb::new(0x7B7D7D),
    Rgb::new(0xEAECEE),
    Rgb::new(0xABB2B9),
    Rgb::new(0x566573),
    Rgb::new(0x17202A),
    Rgb::new(0xF2F3F4),
    Rgb::new(0xBDC3C7),
    Rgb::new(0x626567),
    Rgb::new(0xFDC7CB),
    Rgb::new(0xFA757D),
    Rgb::new(0xFD0716),
    Rgb::new(0xFBD4B0),
    Rgb::new(0xFBB97A),
    Rgb::new(0xFE7C02),
    Rgb::new(0xBB8FCE),
    Rgb::new(0x8E44AD),
    Rgb::new(0x6C3483),
    Rgb::new(0x6D6D86),
    Rgb::new(0x3B3B83),
    Rgb::new(0x000080),
    Rgb::new(0xD6EAF8),
    Rgb::new(0x3498DB),
    Rgb::new(0x1B4F72),
    Rgb::new(0xE9F7EF),
    Rgb::new(0x27AE60),
    Rgb::new(0x145A32),
    Rgb::new(0xD5F5E3),
    Rgb::new(0x2ECC71),
    Rgb::new(0x186A3B),
    Rgb::new(0xFCF3CF),
    Rgb::new(0xF7DC6F),
    Rgb::new(0xF1C40F),
    Rgb::new(0xB7950B),
    Rgb::new(0x7D6608),
    Rgb::new(0xFEE8FE),
    Rgb::new(0xFDB5FD),
    Rgb::new(0xFA7EFA),
    Rgb::new(0xFB39FA),
    Rgb::new(0xFD03FC),
];

/// Hands out colors to instruction pointers.
///
/// One allocator belongs to one aggregation pass, so independent passes never
/// share counters or tables.
pub struct ColorAllocator {
    next_palette_index: usize,
    assigned: HashMap<u64, Rgb>,
    rng: StdRng,
}

impl ColorAllocator {
    /// Creates an allocator whose overflow colors come from `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    /// Creates an allocator with an entropy-seeded RNG.
    pub fn from_entropy() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            next_palette_index: 0,
            assigned: HashMap::new(),
            rng,
        }
    }

    /// Returns the color of `instruction_pointer`, assigning one on first sight.
    pub fn color_for(&mut self, instruction_pointer: u64) -> Rgb {
        if let Some(color) = self.assigned.get(&instruction_pointer) {
            return *color;
        }
        let color = self.next_color();
        self.assigned.insert(instruction_pointer, color);
        color
    }

    /// Number of distinct instruction pointers seen so far.
    pub fn assigned_count(&self) -> usize {
        self.assigned.len()
    }

    /// Returns the color previously given to `instruction_pointer`, if any.
    pub fn get(&self, instruction_pointer: u64) -> Option<Rgb> {
        self.assigned.get(&instruction_pointer).copied()
    }

    fn next_color(&mut self) -> Rgb {
        if let Some(color) = PALETTE.get(self.next_palette_index) {
            self.next_palette_index += 1;
            return *color;
        }
        // Overflow colors must stay distinguishable from palette entries
        loop {
            let candidate = Rgb::new(self.rng.gen_range(0..=0x00FF_FFFF));
            if !PALETTE.contains(&candidate) {
                return candidate;
            }
        }
    }
}
