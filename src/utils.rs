/// Formats `buffer[start..=end]` as 16-byte rows with an ASCII column.
pub fn hexdump(buffer: &[u8], start: u16, end: u16) -> String {
    let mut str = String::new();
    if buffer.is_empty() {
        return str;
    }
    let mut addr = start as usize;
    let end = (end as usize).min(buffer.len().saturating_sub(1));

    while addr <= end {
        let row_end = (addr + 15).min(end);
        let row = &buffer[addr..=row_end];

        let bytes: Vec<String> = row.iter().map(|b| format!("{:02x}", b)).collect();
        let chars: String = row
            .iter()
            .map(|&b| {
                let c = b as char;
                if c.is_ascii_graphic() || c == ' ' {
                    c
                } else {
                    '.'
                }
            })
            .collect();

        str.push_str(&format!("{:04x}: {:<48} {}\n", addr, bytes.join(" "), chars));
        addr += 16;
    }

    str
}
