//! Minimal TrueType face built in memory for raster tests.
//!
//! Every mapped character gets its own glyph: vertical bars spelling the
//! glyph index in binary. Distinct characters therefore rasterize to
//! distinct shapes, whatever script they belong to.

use std::collections::BTreeMap;

const UNITS_PER_EM: u16 = 1000;
const ASCENT: i16 = 800;
const DESCENT: i16 = -200;
const ADVANCE: u16 = 1000;
const SPACE_ADVANCE: u16 = 500;
const BAR_WIDTH: i16 = 60;
const BAR_PITCH: i16 = 90;
const BARS: u16 = 10;

/// Build a face mapping every character of `coverage`. Glyph 0 is an empty
/// `.notdef`; whitespace maps to an empty glyph.
pub fn bar_font(coverage: impl IntoIterator<Item = char>) -> Vec<u8> {
    let mut cmap: BTreeMap<char, u16> = BTreeMap::new();
    let mut glyphs: Vec<(u16, Vec<[i16; 4]>)> = vec![(ADVANCE, Vec::new())];
    for ch in coverage {
        if cmap.contains_key(&ch) {
            continue;
        }
        let id = glyphs.len() as u16;
        cmap.insert(ch, id);
        if ch.is_whitespace() {
            glyphs.push((SPACE_ADVANCE, Vec::new()));
        } else {
            glyphs.push((ADVANCE, bars_for(id)));
        }
    }

    assert!(glyphs.len() < 1 << BARS, "too many glyphs for the bar encoding");

    let mut glyf = Vec::new();
    let mut loca = Vec::new();
    for (_, rects) in &glyphs {
        loca.extend_from_slice(&(glyf.len() as u32).to_be_bytes());
        glyf.extend_from_slice(&simple_glyph(rects));
        while glyf.len() % 4 != 0 {
            glyf.push(0);
        }
    }
    loca.extend_from_slice(&(glyf.len() as u32).to_be_bytes());

    let mut hmtx = Vec::new();
    for (advance, rects) in &glyphs {
        let lsb = rects.first().map_or(0, |rect| rect[0]);
        hmtx.extend_from_slice(&advance.to_be_bytes());
        hmtx.extend_from_slice(&lsb.to_be_bytes());
    }

    let num_glyphs = glyphs.len() as u16;
    sfnt(&[
        (*b"cmap", cmap_table(&cmap)),
        (*b"glyf", glyf),
        (*b"head", head_table()),
        (*b"hhea", hhea_table(num_glyphs)),
        (*b"hmtx", hmtx),
        (*b"loca", loca),
        (*b"maxp", maxp_table(num_glyphs)),
    ])
}

/// Bars for the set bits of `id`, as `[x_min, y_min, x_max, y_max]`.
fn bars_for(id: u16) -> Vec<[i16; 4]> {
    (0..BARS)
        .filter(|bit| id & (1 << bit) != 0)
        .map(|bit| {
            let x = 60 + bit as i16 * BAR_PITCH;
            [x, 0, x + BAR_WIDTH, 700]
        })
        .collect()
}

fn simple_glyph(rects: &[[i16; 4]]) -> Vec<u8> {
    if rects.is_empty() {
        return Vec::new();
    }
    let x_min = rects.iter().map(|r| r[0]).min().unwrap_or(0);
    let y_min = rects.iter().map(|r| r[1]).min().unwrap_or(0);
    let x_max = rects.iter().map(|r| r[2]).max().unwrap_or(0);
    let y_max = rects.iter().map(|r| r[3]).max().unwrap_or(0);

    let mut out = Vec::new();
    push_i16(&mut out, rects.len() as i16);
    for value in [x_min, y_min, x_max, y_max] {
        push_i16(&mut out, value);
    }
    for idx in 0..rects.len() {
        push_u16(&mut out, (idx * 4 + 3) as u16);
    }
    push_u16(&mut out, 0);
    // On-curve points with full 16-bit deltas.
    out.extend(std::iter::repeat(0x01u8).take(rects.len() * 4));

    let points: Vec<(i16, i16)> = rects
        .iter()
        .flat_map(|&[x0, y0, x1, y1]| [(x0, y0), (x0, y1), (x1, y1), (x1, y0)])
        .collect();
    let mut prev = 0;
    for &(x, _) in &points {
        push_i16(&mut out, x - prev);
        prev = x;
    }
    prev = 0;
    for &(_, y) in &points {
        push_i16(&mut out, y - prev);
        prev = y;
    }
    out
}

fn cmap_table(cmap: &BTreeMap<char, u16>) -> Vec<u8> {
    let mut out = Vec::new();
    push_u16(&mut out, 0);
    push_u16(&mut out, 1);
    push_u16(&mut out, 3);
    push_u16(&mut out, 10);
    push_u32(&mut out, 12);

    push_u16(&mut out, 12);
    push_u16(&mut out, 0);
    push_u32(&mut out, 16 + 12 * cmap.len() as u32);
    push_u32(&mut out, 0);
    push_u32(&mut out, cmap.len() as u32);
    for (&ch, &id) in cmap {
        push_u32(&mut out, ch as u32);
        push_u32(&mut out, ch as u32);
        push_u32(&mut out, u32::from(id));
    }
    out
}

fn head_table() -> Vec<u8> {
    let mut out = Vec::new();
    push_u32(&mut out, 0x0001_0000);
    push_u32(&mut out, 0x0001_0000);
    push_u32(&mut out, 0);
    push_u32(&mut out, 0x5F0F_3CF5);
    push_u16(&mut out, 0);
    push_u16(&mut out, UNITS_PER_EM);
    out.extend_from_slice(&[0; 16]);
    for value in [0, DESCENT, ADVANCE as i16, ASCENT] {
        push_i16(&mut out, value);
    }
    push_u16(&mut out, 0);
    push_u16(&mut out, 8);
    push_i16(&mut out, 2);
    // Long loca offsets.
    push_i16(&mut out, 1);
    push_i16(&mut out, 0);
    out
}

fn hhea_table(num_glyphs: u16) -> Vec<u8> {
    let mut out = Vec::new();
    push_u32(&mut out, 0x0001_0000);
    push_i16(&mut out, ASCENT);
    push_i16(&mut out, DESCENT);
    push_i16(&mut out, 0);
    push_u16(&mut out, ADVANCE);
    push_i16(&mut out, 0);
    push_i16(&mut out, 0);
    push_i16(&mut out, ADVANCE as i16);
    push_i16(&mut out, 1);
    push_i16(&mut out, 0);
    push_i16(&mut out, 0);
    out.extend_from_slice(&[0; 8]);
    push_i16(&mut out, 0);
    push_u16(&mut out, num_glyphs);
    out
}

fn maxp_table(num_glyphs: u16) -> Vec<u8> {
    let mut out = Vec::new();
    push_u32(&mut out, 0x0000_5000);
    push_u16(&mut out, num_glyphs);
    out
}

/// Table directory plus 4-byte aligned tables. `tables` must be sorted by tag.
fn sfnt(tables: &[([u8; 4], Vec<u8>)]) -> Vec<u8> {
    let count = tables.len() as u16;
    let mut out = Vec::new();
    push_u32(&mut out, 0x0001_0000);
    push_u16(&mut out, count);
    push_u16(&mut out, 64);
    push_u16(&mut out, 2);
    push_u16(&mut out, count * 16 - 64);

    let mut offset = 12 + 16 * tables.len();
    for (tag, data) in tables {
        out.extend_from_slice(tag);
        push_u32(&mut out, 0);
        push_u32(&mut out, offset as u32);
        push_u32(&mut out, data.len() as u32);
        offset += data.len().next_multiple_of(4);
    }
    for (_, data) in tables {
        out.extend_from_slice(data);
        while out.len() % 4 != 0 {
            out.push(0);
        }
    }
    out
}

fn push_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn push_i16(out: &mut Vec<u8>, value: i16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn push_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}
