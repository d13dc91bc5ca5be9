//! Line-oriented VCD parsing.
//!
//! Header keywords (`$timescale`, `$var`, ...) may span lines and are
//! collected until their `$end`. Everything outside a keyword is read one
//! line at a time as whitespace-separated value changes, so a malformed line
//! can never swallow tokens from the lines around it.

use std::collections::HashMap;
use std::path::Path;

use wavescope_common::{is_bit_char, pad_bits, Timescale};
use wavescope_store::{Signal, SignalId, SignalStore};

use crate::error::VcdError;

/// Counters collected while parsing, reported at `debug` level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Number of input lines read.
    pub lines: usize,
    /// Number of value changes applied to at least one signal.
    pub changes: usize,
    /// Number of tokens or declarations that could not be understood.
    pub skipped: usize,
}

/// The result of parsing a VCD text.
#[derive(Clone, Debug)]
pub struct ParsedTrace {
    /// Signals in declaration order, each starting at time 0.
    pub signals: Vec<Signal>,
    /// The largest timestamp seen.
    pub max_time: u64,
    /// The `$timescale` of the trace, `1 ns` when absent or malformed.
    pub timescale: Timescale,
    /// Parse counters.
    pub stats: ParseStats,
}

impl ParsedTrace {
    /// Moves the parsed signals into a [`SignalStore`].
    pub fn into_store(self) -> SignalStore {
        SignalStore::new(self.signals, self.max_time, self.timescale)
    }
}

/// Parses a VCD document held in memory.
///
/// # Errors
///
/// Returns [`VcdError::Empty`] for blank input and
/// [`VcdError::NoDeclarations`] when no `$var` was declared. Any other
/// irregularity is skipped.
pub fn parse_vcd(text: &str) -> Result<ParsedTrace, VcdError> {
    if text.trim().is_empty() {
        return Err(VcdError::Empty);
    }

    let mut parser = Parser::default();
    for line in text.lines() {
        parser.line(line);
    }
    parser.finish()
}

/// Reads and parses a VCD file.
///
/// # Errors
///
/// Returns [`VcdError::Io`] if the file cannot be read, otherwise the same
/// errors as [`parse_vcd`].
pub fn load_vcd_file(path: &Path) -> Result<ParsedTrace, VcdError> {
    let text = std::fs::read_to_string(path).map_err(|source| VcdError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_vcd(&text)
}

/// A header keyword being collected until its `$end`.
struct PendingKeyword {
    name: String,
    body: Vec<String>,
}

#[derive(Default)]
struct Parser {
    timescale: Option<Timescale>,
    signals: Vec<Signal>,
    by_name: HashMap<String, usize>,
    by_code: HashMap<String, Vec<usize>>,
    current_time: u64,
    max_time: u64,
    pending: Option<PendingKeyword>,
    stats: ParseStats,
}

impl Parser {
    fn line(&mut self, line: &str) {
        self.stats.lines += 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let mut i = 0;
        while i < tokens.len() {
            let token = tokens[i];
            i += 1;

            if let Some(pending) = self.pending.as_mut() {
                if token == "$end" {
                    if let Some(done) = self.pending.take() {
                        self.keyword(done);
                    }
                } else {
                    pending.body.push(token.to_string());
                }
                continue;
            }

            if let Some(keyword) = token.strip_prefix('$') {
                match keyword.to_ascii_lowercase().as_str() {
                    // Dump blocks hold ordinary changes; their `$end` is skipped.
                    "dumpvars" | "dumpall" | "dumpon" | "dumpoff" | "end" => {}
                    "" => self.stats.skipped += 1,
                    other => {
                        self.pending = Some(PendingKeyword {
                            name: other.to_string(),
                            body: Vec::new(),
                        });
                    }
                }
                continue;
            }

            i += self.value_change(token, tokens.get(i).copied());
        }
    }

    /// Applies one value change starting at `token`. Returns how many of the
    /// following tokens were consumed.
    fn value_change(&mut self, token: &str, next: Option<&str>) -> usize {
        let Some(first) = token.chars().next() else {
            return 0;
        };

        if first == '#' {
            match token[1..].parse::<u64>() {
                Ok(t) if t >= self.current_time => {
                    self.current_time = t;
                    self.max_time = self.max_time.max(t);
                }
                Ok(t) => {
                    log::debug!(
                        "ignoring timestamp #{t} earlier than current time #{}",
                        self.current_time
                    );
                }
                Err(_) => self.stats.skipped += 1,
            }
            return 0;
        }

        // Scalar: value character immediately followed by the identifier.
        if matches!(first.to_ascii_lowercase(), '0' | '1' | 'x' | 'z')
            && token.len() > 1
            && self.by_code.contains_key(&token[1..])
        {
            let bit = normalize_bits(&token[..1]);
            self.apply(&token[1..], |width| pad_bits(&bit, width));
            return 0;
        }

        match first {
            'b' | 'B' => {
                let Some(code) = next else {
                    self.stats.skipped += 1;
                    return 0;
                };
                let bits = &token[1..];
                if bits.is_empty() || !bits.chars().all(is_bit_char) {
                    self.stats.skipped += 1;
                    return 1;
                }
                let bits = normalize_bits(bits);
                self.apply(code, |width| pad_bits(&bits, width));
                1
            }
            'r' | 'R' => {
                let Some(code) = next else {
                    self.stats.skipped += 1;
                    return 0;
                };
                let number = &token[1..];
                if number.parse::<f64>().is_err() {
                    self.stats.skipped += 1;
                    return 1;
                }
                let literal = format!("r{number}");
                self.apply(code, |_| literal.clone());
                1
            }
            's' | 'S' => {
                let Some(code) = next else {
                    self.stats.skipped += 1;
                    return 0;
                };
                let literal = format!("s{}", &token[1..]);
                self.apply(code, |_| literal.clone());
                1
            }
            _ => {
                // Alternate vector encoding: bare bits, then the identifier.
                let is_vector = token.chars().all(is_bit_char)
                    && next.is_some_and(|code| self.by_code.contains_key(code));
                match next {
                    Some(code) if is_vector => {
                        let bits = normalize_bits(token);
                        self.apply(code, |width| pad_bits(&bits, width));
                        1
                    }
                    _ => {
                        self.stats.skipped += 1;
                        0
                    }
                }
            }
        }
    }

    /// Records a value for every signal declared with `code`.
    fn apply(&mut self, code: &str, value_for_width: impl Fn(u32) -> String) {
        let Some(indices) = self.by_code.get(code) else {
            log::trace!("value change for unknown identifier '{code}'");
            self.stats.skipped += 1;
            return;
        };
        for &idx in indices {
            let signal = &mut self.signals[idx];
            let value = value_for_width(signal.width);
            signal.record(self.current_time, value);
        }
        self.stats.changes += 1;
    }

    fn keyword(&mut self, keyword: PendingKeyword) {
        match keyword.name.as_str() {
            "timescale" => {
                let body = keyword.body.join(" ");
                match Timescale::parse(&body) {
                    Some(ts) => self.timescale = Some(ts),
                    None => log::warn!("malformed $timescale '{body}', using 1 ns"),
                }
            }
            "var" => self.declare(&keyword.body),
            _ => {}
        }
    }

    /// Handles `$var <type> <width> <code> <name> [range]`.
    fn declare(&mut self, body: &[String]) {
        let [_var_type, width, code, name, ..] = body else {
            log::warn!("skipping malformed $var '{}'", body.join(" "));
            self.stats.skipped += 1;
            return;
        };
        let Ok(width) = width.parse::<u32>() else {
            log::warn!("skipping $var '{name}' with invalid width '{width}'");
            self.stats.skipped += 1;
            return;
        };
        let name = strip_range(name);

        if let Some(&existing) = self.by_name.get(name) {
            if self.signals[existing].code != *code {
                log::warn!(
                    "signal '{name}' redeclared with identifier '{code}', keeping '{}'",
                    self.signals[existing].code
                );
            }
            return;
        }

        let idx = self.signals.len();
        let id = SignalId::from_raw(idx as u32);
        let aliases = self.by_code.entry(code.clone()).or_default();
        if !aliases.is_empty() {
            log::debug!("identifier '{code}' aliased by '{name}'");
        }
        aliases.push(idx);
        self.by_name.insert(name.to_string(), idx);
        self.signals.push(Signal::new(id, code.clone(), name, width));
    }

    fn finish(mut self) -> Result<ParsedTrace, VcdError> {
        if self.signals.is_empty() {
            return Err(VcdError::NoDeclarations);
        }
        if let Some(pending) = &self.pending {
            log::warn!("unterminated ${} at end of input", pending.name);
        }
        for signal in &mut self.signals {
            signal.ensure_initial_value();
        }
        let timescale = self.timescale.unwrap_or_default();
        log::debug!(
            "parsed VCD: {} signals, max time {}, timescale {}, {} changes, {} skipped",
            self.signals.len(),
            self.max_time,
            timescale,
            self.stats.changes,
            self.stats.skipped
        );
        Ok(ParsedTrace {
            signals: self.signals,
            max_time: self.max_time,
            timescale,
            stats: self.stats,
        })
    }
}

/// Removes a trailing `[n]` or `[n:m]` range from a declared name.
fn strip_range(name: &str) -> &str {
    match name.find('[') {
        Some(pos) if pos > 0 && name.ends_with(']') => &name[..pos],
        _ => name,
    }
}

/// Lower-cases a bit string and maps the nine-state characters onto
/// `0`/`1`/`x`/`z`.
fn normalize_bits(bits: &str) -> String {
    bits.chars()
        .map(|c| match c.to_ascii_lowercase() {
            '0' | 'l' => '0',
            '1' | 'h' => '1',
            'z' => 'z',
            _ => 'x',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use wavescope_common::{TimeUnit, ValueKind};

    fn clk_data() -> &'static str {
        "\
$date
  today
$end
$timescale 1ns $end
$scope module top $end
$var wire 1 ! clk $end
$var wire 4 \" data [3:0] $end
$upscope $end
$enddefinitions $end
$dumpvars
0!
b0000 \"
$end
#5
1!
#10
0!
b1010 \"
#15
1!
"
    }

    fn signal<'a>(trace: &'a ParsedTrace, name: &str) -> &'a Signal {
        trace.signals.iter().find(|s| s.name == name).unwrap()
    }

    #[test]
    fn parse_clk_and_data() {
        let trace = parse_vcd(clk_data()).unwrap();
        assert_eq!(trace.signals.len(), 2);
        assert_eq!(trace.max_time, 15);
        assert_eq!(trace.timescale, Timescale::new(1, TimeUnit::Ns));

        let clk = signal(&trace, "clk");
        assert_eq!(clk.width, 1);
        assert!(!clk.is_bus);
        assert_eq!(clk.value_at_time(7), "1");
        assert_eq!(clk.value_at_time(12), "0");

        let data = signal(&trace, "data");
        assert_eq!(data.width, 4);
        assert!(data.is_bus);
        assert_eq!(data.code, "\"");
        assert_eq!(data.value_at_time(12), "1010");
    }

    #[test]
    fn ids_follow_declaration_order() {
        let trace = parse_vcd(clk_data()).unwrap();
        let ids: Vec<u32> = trace.signals.iter().map(|s| s.id.as_raw()).collect();
        assert_eq!(ids, [0, 1]);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(parse_vcd(""), Err(VcdError::Empty)));
        assert!(matches!(parse_vcd("  \n\t\n"), Err(VcdError::Empty)));
    }

    #[test]
    fn no_declarations_is_an_error() {
        let vcd = "$timescale 1ns $end\n$enddefinitions $end\n#0\n1!\n";
        assert!(matches!(parse_vcd(vcd), Err(VcdError::NoDeclarations)));
    }

    #[test]
    fn timescale_split_across_lines() {
        let vcd = "$timescale\n  10 ps\n$end\n$var wire 1 ! a $end\n";
        let trace = parse_vcd(vcd).unwrap();
        assert_eq!(trace.timescale, Timescale::new(10, TimeUnit::Ps));
    }

    #[test]
    fn missing_or_malformed_timescale_defaults() {
        let trace = parse_vcd("$var wire 1 ! a $end\n").unwrap();
        assert_eq!(trace.timescale, Timescale::default());
        let trace = parse_vcd("$timescale 3 furlongs $end\n$var wire 1 ! a $end\n").unwrap();
        assert_eq!(trace.timescale, Timescale::default());
    }

    #[test]
    fn implicit_default_at_time_zero() {
        let vcd = "$var wire 8 # bus $end\n$var wire 1 ! idle $end\n#20\nb11 #\n";
        let trace = parse_vcd(vcd).unwrap();
        let bus = signal(&trace, "bus");
        assert_eq!(bus.values[0].time, 0);
        assert_eq!(bus.values[0].value, "00000000");
        assert_eq!(bus.value_at_time(20), "00000011");
        let idle = signal(&trace, "idle");
        assert_eq!(idle.values.len(), 1);
        assert_eq!(idle.value_at_time(100), "0");
    }

    #[test]
    fn vector_extension_rules() {
        let vcd = "\
$var wire 4 ! a $end
$var wire 4 \" b $end
$var wire 4 # c $end
#0
b1 !
bx0 \"
bZ #
";
        let trace = parse_vcd(vcd).unwrap();
        assert_eq!(signal(&trace, "a").value_at_time(0), "0001");
        assert_eq!(signal(&trace, "b").value_at_time(0), "xxx0");
        assert_eq!(signal(&trace, "c").value_at_time(0), "zzzz");
    }

    #[test]
    fn scalar_xz_either_case() {
        let vcd = "$var wire 1 ! a $end\n#0\nX!\n#1\nz!\n#2\n1!\n";
        let trace = parse_vcd(vcd).unwrap();
        let a = signal(&trace, "a");
        assert_eq!(a.value_at_time(0), "x");
        assert_eq!(a.value_at_time(1), "z");
        assert_eq!(a.value_at_time(2), "1");
    }

    #[test]
    fn real_and_string_literals() {
        let vcd = "\
$var real 64 ! temp $end
$var string 1 \" state $end
#0
r1.25 !
sIDLE \"
#4
r-3e2 !
sBUSY \"
";
        let trace = parse_vcd(vcd).unwrap();
        assert_eq!(signal(&trace, "temp").value_at_time(0), "r1.25");
        assert_eq!(signal(&trace, "temp").value_at_time(4), "r-3e2");
        assert_eq!(signal(&trace, "state").value_at_time(3), "sIDLE");
        assert_eq!(signal(&trace, "state").value_at_time(4), "sBUSY");
    }

    #[test]
    fn alternate_vector_encoding() {
        let vcd = "$var wire 3 %% v $end\n#0\n101 %%\n#2\n1x %%\n";
        let trace = parse_vcd(vcd).unwrap();
        let v = signal(&trace, "v");
        assert_eq!(v.value_at_time(0), "101");
        assert_eq!(v.value_at_time(2), "01x");
    }

    #[test]
    fn several_changes_on_one_line() {
        let vcd = "$var wire 1 ! a $end\n$var wire 2 \" b $end\n#0 1! b10 \" #3 0! b01 \"\n";
        let trace = parse_vcd(vcd).unwrap();
        assert_eq!(signal(&trace, "a").value_at_time(2), "1");
        assert_eq!(signal(&trace, "a").value_at_time(3), "0");
        assert_eq!(signal(&trace, "b").value_at_time(3), "01");
        assert_eq!(trace.max_time, 3);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let vcd = "\
$var wire 1 ! a $end
$var wire 4 \" b $end
#0
0!
b10q1 \"
garbage here
b11
#notanumber
#5
1!
";
        let trace = parse_vcd(vcd).unwrap();
        let a = signal(&trace, "a");
        assert_eq!(a.value_at_time(5), "1");
        assert_eq!(signal(&trace, "b").value_at_time(5), "0000");
        assert!(trace.stats.skipped >= 4);
        assert_eq!(trace.max_time, 5);
    }

    #[test]
    fn unknown_identifiers_ignored() {
        let vcd = "$var wire 1 ! a $end\n#0\n1?\nb1 @\n1!\n";
        let trace = parse_vcd(vcd).unwrap();
        assert_eq!(signal(&trace, "a").value_at_time(0), "1");
        assert_eq!(trace.stats.changes, 1);
    }

    #[test]
    fn range_suffix_stripped_attached_or_separate() {
        let vcd = "$var wire 8 ! addr[7:0] $end\n$var wire 4 \" data [3:0] $end\n";
        let trace = parse_vcd(vcd).unwrap();
        let names: Vec<&str> = trace.signals.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["addr", "data"]);
    }

    #[test]
    fn aliased_identifier_feeds_every_name() {
        let vcd = "$var wire 1 ! clk $end\n$var wire 1 ! clk_copy $end\n#0\n1!\n";
        let trace = parse_vcd(vcd).unwrap();
        assert_eq!(trace.signals.len(), 2);
        assert_eq!(signal(&trace, "clk").value_at_time(0), "1");
        assert_eq!(signal(&trace, "clk_copy").value_at_time(0), "1");
    }

    #[test]
    fn duplicate_name_keeps_first_declaration() {
        let vcd = "$var wire 1 ! a $end\n$var wire 4 \" a $end\n#0\n1!\nb1111 \"\n";
        let trace = parse_vcd(vcd).unwrap();
        assert_eq!(trace.signals.len(), 1);
        assert_eq!(trace.signals[0].width, 1);
        assert_eq!(trace.signals[0].value_at_time(0), "1");
    }

    #[test]
    fn backwards_timestamp_ignored() {
        let vcd = "$var wire 1 ! a $end\n#10\n1!\n#4\n0!\n";
        let trace = parse_vcd(vcd).unwrap();
        let a = signal(&trace, "a");
        // the change after #4 lands at the current time, 10, and replaces it
        assert_eq!(a.value_at_time(10), "0");
        assert_eq!(trace.max_time, 10);
    }

    #[test]
    fn multichar_identifier_codes() {
        let vcd = "$var wire 1 !# a $end\n$var wire 1 !$ b $end\n#0\n1!#\n0!$\n#1\n0!#\n1!$\n";
        let trace = parse_vcd(vcd).unwrap();
        assert_eq!(signal(&trace, "a").value_at_time(1), "0");
        assert_eq!(signal(&trace, "b").value_at_time(1), "1");
    }

    #[test]
    fn nine_state_characters_normalized() {
        let vcd = "$var wire 4 ! v $end\n#0\nbHLUW !\n";
        let trace = parse_vcd(vcd).unwrap();
        assert_eq!(signal(&trace, "v").value_at_time(0), "10xx");
    }

    /// Every stored value is ascending in time and either `width` bits long
    /// or a tagged real/string literal.
    fn assert_well_formed(trace: &ParsedTrace) {
        for sig in &trace.signals {
            assert!(sig.values.windows(2).all(|w| w[0].time < w[1].time));
            for change in &sig.values {
                let literal = ValueKind::classify(&change.value).is_literal();
                assert!(
                    literal || change.value.len() == sig.width as usize,
                    "{} at #{}: '{}' is not {} bits",
                    sig.name,
                    change.time,
                    change.value,
                    sig.width
                );
            }
        }
    }

    #[test]
    fn values_strictly_ascending() {
        assert_well_formed(&parse_vcd(clk_data()).unwrap());
    }

    #[test]
    fn scalar_change_on_bus_is_extended() {
        let vcd = "$var wire 4 ! d $end\n#0\n1!\n#5\nx!\n#7\nZ!\n";
        let trace = parse_vcd(vcd).unwrap();
        let d = signal(&trace, "d");
        assert_eq!(d.value_at_time(0), "0001");
        assert_eq!(d.value_at_time(5), "xxxx");
        assert_eq!(d.value_at_time(7), "zzzz");
        assert_well_formed(&trace);
    }

    #[test]
    fn mismatched_widths_are_normalized() {
        let vcd = "\
$var wire 4 ! d $end
$var wire 1 \" s $end
$var wire 8 # bus $end
#0
b110011 !
b10 \"
1#
#5
r2.5 #
#6
shello !
#7
b1 #
";
        let trace = parse_vcd(vcd).unwrap();
        assert_eq!(signal(&trace, "d").value_at_time(0), "0011");
        assert_eq!(signal(&trace, "s").value_at_time(0), "0");
        assert_eq!(signal(&trace, "bus").value_at_time(0), "00000001");
        assert_eq!(signal(&trace, "bus").value_at_time(5), "r2.5");
        assert_eq!(signal(&trace, "bus").value_at_time(7), "00000001");
        assert_well_formed(&trace);
    }

    #[test]
    fn into_store_keeps_metadata() {
        let store = parse_vcd(clk_data()).unwrap().into_store();
        assert_eq!(store.len(), 2);
        assert_eq!(store.max_time(), 15);
        assert!(store.find("data").is_some());
    }

    #[test]
    fn load_vcd_file_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(clk_data().as_bytes()).unwrap();
        let trace = load_vcd_file(file.path()).unwrap();
        assert_eq!(trace.signals.len(), 2);
    }

    #[test]
    fn load_vcd_file_not_found() {
        let err = load_vcd_file(Path::new("/nonexistent/trace.vcd")).unwrap_err();
        assert!(matches!(err, VcdError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/trace.vcd"));
    }

    proptest::proptest! {
        #[test]
        fn arbitrary_text_never_panics(text in "[ -~\\n]{0,400}") {
            if let Ok(trace) = parse_vcd(&text) {
                assert_well_formed(&trace);
            }
        }

        #[test]
        fn any_change_form_keeps_width(
            width in 1u32..12,
            changes in proptest::collection::vec(
                (0u64..4, "[01xz]{1,16}", 0usize..4),
                0..24,
            ),
        ) {
            let mut vcd = format!("$var wire {width} ! w $end\n$enddefinitions $end\n");
            let mut time = 0;
            for (step, bits, form) in changes {
                time += step;
                vcd.push_str(&format!("#{time}\n"));
                match form {
                    0 => vcd.push_str(&format!("{}!\n", &bits[..1])),
                    1 => vcd.push_str(&format!("b{bits} !\n")),
                    2 => vcd.push_str(&format!("{bits} !\n")),
                    _ => vcd.push_str("r1.5 !\n"),
                }
            }
            let trace = parse_vcd(&vcd).unwrap();
            assert_well_formed(&trace);
        }
    }
}
