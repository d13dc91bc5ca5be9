//! End-to-end scenarios through the public engine surface.

use wavescope_engine::{EngineError, WaveformEngine};
use wavescope_export::{ExportFormat, ExportOptions};
use wavescope_format::{format, Base};
use wavescope_render::DrawList;

const CLK_DATA: &str = "\
$timescale 1ns $end
$scope module top $end
$var wire 1 ! clk $end
$var wire 4 \" data $end
$upscope $end
$enddefinitions $end
#0
0!
b0000 \"
#5
1!
#10
0!
b1010 \"
";

fn loaded() -> WaveformEngine {
    let mut engine = WaveformEngine::default();
    assert_eq!(engine.load_vcd(CLK_DATA).unwrap(), 2);
    engine
}

#[test]
fn value_lookup_between_changes() {
    let engine = loaded();
    let store = engine.store();
    let clk = store.find("clk").unwrap();
    let data = store.find("data").unwrap();
    assert_eq!(clk.value_at_time(7), "0");
    assert_eq!(data.value_at_time(12), "1010");
    assert_eq!(store.max_time(), 10);
}

#[test]
fn signed_decimal_formatting() {
    assert_eq!(format("1001", 4, true, Base::Decimal), "-7");
}

#[test]
fn unsigned_hex_and_decimal_formatting() {
    assert_eq!(format("00001111", 8, false, Base::Hex), "F");
    assert_eq!(format("00001111", 8, false, Base::Decimal), "15");
}

#[test]
fn svg_export_matches_requested_size() {
    let engine = loaded();
    let payload = engine
        .export(&ExportOptions {
            format: ExportFormat::Svg,
            width: 800,
            height: Some(200),
            ..ExportOptions::default()
        })
        .unwrap();
    let svg = payload.as_text().unwrap();
    assert_eq!(svg.matches("<svg").count(), 1);
    assert!(svg.contains("viewBox=\"0 0 800 200\""), "{svg}");
}

#[test]
fn trace_without_declarations_renders() {
    let mut engine = WaveformEngine::default();
    let err = engine
        .load_vcd("$timescale 1ns $end\n$enddefinitions $end\n#0\n#10\n")
        .unwrap_err();
    assert!(matches!(err, EngineError::Vcd(_)));
    assert_eq!(engine.signal_list().len(), 0);

    let mut list = DrawList::new();
    engine.render(&mut list);
    assert!(!list.is_empty());
    assert!(engine.export(&ExportOptions::default()).is_ok());
}

#[test]
fn scripted_session() {
    let mut engine = loaded();
    let script = "\
# zoom onto the second half and inspect data
@0 fit
@100 select 5ns 10ns
@200 zoom
@300 fmt data dec
@400 cursor 10
";
    assert_eq!(engine.run_script(script).unwrap(), 5);
    let (start, end) = engine.viewport().visible_range();
    assert!((start - 5.0).abs() < 1e-9);
    assert!((end - 10.0).abs() < 1e-9);
    let values = engine.cursor_values();
    assert_eq!(values[1].name, "data");
    assert_eq!(values[1].primary.as_deref(), Some("10"));
}

#[test]
fn export_formats_share_layout() {
    let mut engine = loaded();
    engine.run_command("expand data").unwrap();
    for format in [ExportFormat::Svg, ExportFormat::Png, ExportFormat::Pdf] {
        let payload = engine
            .export(&ExportOptions {
                format,
                width: 400,
                ..ExportOptions::default()
            })
            .unwrap();
        assert_eq!(payload.format, format);
        assert_eq!(payload.width, 400);
        assert!(!payload.bytes.is_empty());
    }
}
