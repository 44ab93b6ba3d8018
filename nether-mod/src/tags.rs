//! Tag table: 4-byte magic at offset 1080 to channel count and tracker name

/// Placeholder in a name template that is replaced by the channel count
pub const CHANNELS_PLACEHOLDER: &str = "{}";

/// Known MOD tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagEntry {
    /// Magic bytes at offset 1080
    pub magic: [u8; 4],
    /// Channels the tag implies
    pub channels: u8,
    /// Tracker name, optionally containing [`CHANNELS_PLACEHOLDER`]
    pub name_template: &'static str,
}

impl TagEntry {
    /// Tracker name with the channel count filled in
    pub fn description(&self) -> String {
        format_label(self.name_template, self.channels)
    }
}

const fn tag(magic: &[u8; 4], channels: u8, name_template: &'static str) -> TagEntry {
    TagEntry {
        magic: *magic,
        channels,
        name_template,
    }
}

/// Every tag the detector accepts
///
/// `M.K.` must stay first: it is the only tag that WOW files reuse.
pub static TAG_TABLE: &[TagEntry] = &[
    tag(b"M.K.", 4, "Amiga-NewTracker"),
    tag(b"M!K!", 4, "Amiga-ProTracker"),
    tag(b"M&K!", 4, "Amiga-NoiseTracker"),
    tag(b"N.T.", 4, "Amiga-NoiseTracker"),
    tag(b"FEST", 4, "Amiga-NoiseTracker"),
    // Atari Octalyser
    tag(b"CD61", 6, "{} Channel Falcon"),
    tag(b"CD81", 8, "{} Channel Falcon"),
    // Startrekker
    tag(b"FLT4", 4, "{} Channel Startrekker"),
    tag(b"EXO4", 4, "{} Channel Startrekker"),
    tag(b"FLT8", 8, "{} Channel Startrekker"),
    tag(b"EXO8", 8, "{} Channel Startrekker"),
    // Oktalyzer
    tag(b"OCTA", 8, "{} Channel MOD"),
    tag(b"OKTA", 8, "{} Channel MOD"),
    // TakeTracker
    tag(b"TDZ1", 1, "{} Channel MOD"),
    tag(b"TDZ2", 2, "{} Channel MOD"),
    tag(b"TDZ3", 3, "{} Channel MOD"),
    // Generic xCHN / xxCN / xxCH
    tag(b"1CHN", 1, "{} Channel MOD"),
    tag(b"2CHN", 2, "{} Channel MOD"),
    tag(b"3CHN", 3, "{} Channel MOD"),
    tag(b"4CHN", 4, "{} Channel MOD"),
    tag(b"5CHN", 5, "{} Channel MOD"),
    tag(b"6CHN", 6, "{} Channel MOD"),
    tag(b"7CHN", 7, "{} Channel MOD"),
    tag(b"8CHN", 8, "{} Channel MOD"),
    tag(b"9CHN", 9, "{} Channel MOD"),
    tag(b"10CN", 10, "{} Channel MOD"),
    tag(b"10CH", 10, "{} Channel MOD"),
    tag(b"11CN", 11, "{} Channel MOD"),
    tag(b"11CH", 11, "{} Channel MOD"),
    tag(b"12CN", 12, "{} Channel MOD"),
    tag(b"12CH", 12, "{} Channel MOD"),
    tag(b"13CN", 13, "{} Channel MOD"),
    tag(b"13CH", 13, "{} Channel MOD"),
    tag(b"14CN", 14, "{} Channel MOD"),
    tag(b"14CH", 14, "{} Channel MOD"),
    tag(b"15CN", 15, "{} Channel MOD"),
    tag(b"15CH", 15, "{} Channel MOD"),
    tag(b"16CN", 16, "{} Channel MOD"),
    tag(b"16CH", 16, "{} Channel MOD"),
    tag(b"17CN", 17, "{} Channel MOD"),
    tag(b"17CH", 17, "{} Channel MOD"),
    tag(b"18CN", 18, "{} Channel MOD"),
    tag(b"18CH", 18, "{} Channel MOD"),
    tag(b"19CN", 19, "{} Channel MOD"),
    tag(b"19CH", 19, "{} Channel MOD"),
    tag(b"20CN", 20, "{} Channel MOD"),
    tag(b"20CH", 20, "{} Channel MOD"),
    tag(b"21CN", 21, "{} Channel MOD"),
    tag(b"21CH", 21, "{} Channel MOD"),
    tag(b"22CN", 22, "{} Channel MOD"),
    tag(b"22CH", 22, "{} Channel MOD"),
    tag(b"23CN", 23, "{} Channel MOD"),
    tag(b"23CH", 23, "{} Channel MOD"),
    tag(b"24CN", 24, "{} Channel MOD"),
    tag(b"24CH", 24, "{} Channel MOD"),
    tag(b"25CN", 25, "{} Channel MOD"),
    tag(b"25CH", 25, "{} Channel MOD"),
    tag(b"26CN", 26, "{} Channel MOD"),
    tag(b"26CH", 26, "{} Channel MOD"),
    tag(b"27CN", 27, "{} Channel MOD"),
    tag(b"27CH", 27, "{} Channel MOD"),
    tag(b"28CN", 28, "{} Channel MOD"),
    tag(b"28CH", 28, "{} Channel MOD"),
    tag(b"29CN", 29, "{} Channel MOD"),
    tag(b"29CH", 29, "{} Channel MOD"),
    tag(b"30CN", 30, "{} Channel MOD"),
    tag(b"30CH", 30, "{} Channel MOD"),
    tag(b"31CN", 31, "{} Channel MOD"),
    tag(b"31CH", 31, "{} Channel MOD"),
    tag(b"32CN", 32, "{} Channel MOD"),
    tag(b"32CH", 32, "{} Channel MOD"),
];

/// Look up an exact tag
pub fn find_tag(magic: &[u8]) -> Option<&'static TagEntry> {
    TAG_TABLE.iter().find(|entry| entry.magic[..] == *magic)
}

/// Fill the channel count into a name template
pub fn format_label(template: &str, channels: u8) -> String {
    template.replacen(CHANNELS_PLACEHOLDER, &channels.to_string(), 1)
}
