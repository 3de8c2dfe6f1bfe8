// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph cache.
//!
//! Index atlas slots by (font, glyph, size, style) with a custom comparator, then evict
//! everything belonging to one font.
//!
//! Run:
//! - `cargo run -p understory_examples --example glyph_cache`

use core::cmp::Ordering;

use kurbo::Rect;
use understory_ordered_index::{Comparator, Order, OrderedIndex, Visit};

bitflags::bitflags! {
    /// Rasterization style bits that select a distinct atlas entry.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    struct GlyphStyle: u8 {
        const BOLD = 0b0000_0001;
        const ITALIC = 0b0000_0010;
        const SUBPIXEL = 0b0000_0100;
    }
}

#[derive(Clone, Copy, Debug)]
struct GlyphKey {
    font: u16,
    glyph: u32,
    /// Font size in 1/64 px.
    size: u32,
    style: GlyphStyle,
}

/// Orders by font first so a font's glyphs are contiguous.
#[derive(Clone, Copy, Debug)]
struct ByFont;

impl Comparator<GlyphKey> for ByFont {
    fn compare(&self, a: &GlyphKey, b: &GlyphKey) -> Ordering {
        a.font
            .cmp(&b.font)
            .then(a.glyph.cmp(&b.glyph))
            .then(a.size.cmp(&b.size))
            .then(a.style.bits().cmp(&b.style.bits()))
    }
}

#[derive(Clone, Debug)]
struct AtlasSlot {
    page: u8,
    rect: Rect,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut cache = OrderedIndex::with_comparator(ByFont);
    let mut x = 0.0;
    for font in 0..3_u16 {
        for glyph in [65_u32, 66, 67] {
            for style in [GlyphStyle::empty(), GlyphStyle::BOLD | GlyphStyle::SUBPIXEL] {
                let key = GlyphKey {
                    font,
                    glyph,
                    size: 16 * 64,
                    style,
                };
                let slot = AtlasSlot {
                    page: 0,
                    rect: Rect::new(x, 0.0, x + 12.0, 16.0),
                };
                x += 12.0;
                cache.insert(key, slot).unwrap();
            }
        }
    }
    println!("cached {} glyphs, height {}", cache.len(), cache.height());

    let probe = GlyphKey {
        font: 1,
        glyph: 66,
        size: 16 * 64,
        style: GlyphStyle::BOLD | GlyphStyle::SUBPIXEL,
    };
    if let Some(slot) = cache.find(&probe) {
        println!("hit {probe:?} -> page {} {:?}", slot.page, slot.rect);
    }

    // Collect font 1's entries; the order keeps them contiguous so the walk can stop early.
    let mut evict = Vec::new();
    cache.traverse(Order::Ascending, |k: &GlyphKey, _: &AtlasSlot| {
        if k.font > 1 {
            return Visit::Stop;
        }
        if k.font == 1 {
            evict.push(*k);
        }
        Visit::Continue
    });
    let mut freed = 0.0;
    for key in &evict {
        if let Ok(slot) = cache.remove(key) {
            freed += slot.rect.area();
        }
    }
    println!(
        "evicted {} glyphs of font 1 ({freed} px^2), {} remain",
        evict.len(),
        cache.len()
    );
    cache.validate().unwrap();
}
