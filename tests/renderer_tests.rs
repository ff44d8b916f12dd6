mod common;

use common::{
    FixedAdvanceProvider, HEBREW_FONT, RecordingSink, SinkEvent, renderer, renderer_retaining_one,
    texture_of,
};
use glyphstring::palette::rgba;
use glyphstring::{
    Config, DrawSink, FontId, LayoutError, Palette, ProviderError, QuadBatcher, StringRenderer,
    TextureId,
};

const WHITE: u32 = 0xffff_ffff;
const RED: [u8; 4] = [0xff, 0x55, 0x55, 0xff];

fn draw(renderer: &mut StringRenderer<FixedAdvanceProvider>, s: &str) -> RecordingSink {
    let mut sink = RecordingSink::new();
    renderer
        .draw(s, 0.0, 0.0, WHITE, false, &mut sink)
        .expect("draw");
    sink
}

// ============================================================================
// Measuring
// ============================================================================

#[test]
fn test_measure_halves_layout_advance() {
    let mut r = renderer();
    assert_eq!(r.measure("abc").unwrap(), 15);
    assert_eq!(r.measure("iW").unwrap(), 9);
}

#[test]
fn test_measure_ignores_codes() {
    let mut r = renderer();
    assert_eq!(r.measure("§cabc").unwrap(), 15);
    assert_eq!(r.measure("§l§oa§rbc").unwrap(), 15);
}

#[test]
fn test_unknown_code_is_stripped() {
    let mut r = renderer();
    assert_eq!(r.measure("a§zb").unwrap(), 10);
    assert_eq!(r.fit_width("a§zb", 5).unwrap(), 3);
}

#[test]
fn test_trailing_marker_is_drawn() {
    let mut r = renderer();
    assert_eq!(r.measure("ab§").unwrap(), 15);
    let sink = draw(&mut r, "ab§");
    assert_eq!(sink.drawn_chars(), "ab§");
}

#[test]
fn test_empty_string_touches_nothing() {
    let mut r = renderer();
    let cached = r.cache().len();
    let mut sink = RecordingSink::new();

    assert_eq!(r.measure("").unwrap(), 0);
    assert_eq!(r.fit_width("", 10).unwrap(), 0);
    assert_eq!(r.trim("", 10, true).unwrap(), "");
    assert_eq!(r.draw("", 0.0, 0.0, WHITE, false, &mut sink).unwrap(), 0);

    assert!(sink.events.is_empty());
    assert_eq!(r.cache().len(), cached);
}

// ============================================================================
// Digits
// ============================================================================

#[test]
fn test_strings_differing_in_digits_share_a_layout() {
    let mut r = renderer();
    let bootstrap = r.cache().len();

    let first = r.get_or_layout("Score 12").unwrap();
    let shaped = r.provider().shape_calls.len();
    let second = r.get_or_layout("Score 99").unwrap();

    assert!(std::rc::Rc::ptr_eq(&first, &second));
    assert_eq!(r.cache().len(), bootstrap + 1);
    assert_eq!(r.provider().shape_calls.len(), shaped);
    assert_eq!(r.measure("§c1§r2").unwrap(), r.measure("§c9§r2").unwrap());
}

#[test]
fn test_digits_are_shaped_as_zero() {
    let mut r = renderer();
    r.provider_mut().shape_calls.clear();
    r.measure("x7").unwrap();
    assert_eq!(r.provider().shape_calls[0].text, "x0");
}

#[test]
fn test_color_code_digits_are_not_normalized() {
    let mut r = renderer();
    let palette = Palette::default();

    let sink = draw(&mut r, "§1x");
    assert!(sink.colors().contains(&rgba(palette.apply(Some(1), WHITE, false))));

    let sink = draw(&mut r, "§2x");
    assert!(sink.colors().contains(&rgba(palette.apply(Some(2), WHITE, false))));
    assert!(!sink.colors().contains(&rgba(palette.apply(Some(1), WHITE, false))));
}

#[test]
fn test_draw_colors_and_recenters_digits() {
    let mut r = renderer();
    let mut sink = RecordingSink::new();
    let advance = r.draw("§c1§r2", 0.0, 0.0, WHITE, false, &mut sink).unwrap();
    assert_eq!(advance, 10);

    assert_eq!(
        sink.colors(),
        vec![[0xff; 4], RED, RED, [0xff; 4]],
        "initial, red for '1', re-sent after bind, reset for '2'"
    );

    let quads = sink.textured_quads();
    assert_eq!(quads.len(), 2);

    // '1' is narrower than the '0' placeholder and is centered over it
    assert_eq!(quads[0].u1, '1' as u32 as f32);
    assert_eq!((quads[0].x1, quads[0].x2), (1.0, 3.0));
    assert_eq!((quads[0].y1, quads[0].y2), (0.0, 8.0));

    assert_eq!(quads[1].u1, '2' as u32 as f32);
    assert_eq!((quads[1].x1, quads[1].x2), (5.0, 9.0));
}

#[test]
fn test_bold_digits_use_bold_glyphs() {
    let mut r = renderer();
    let sink = draw(&mut r, "§l1");
    assert_eq!(sink.drawn_chars(), "1");
    assert_eq!(sink.binds(), vec![Some(texture_of(FontId(1), '1'))]);
}

// ============================================================================
// Fitting and trimming
// ============================================================================

#[test]
fn test_fit_width_counts_original_characters() {
    let mut r = renderer();
    assert_eq!(r.fit_width("abc", 15).unwrap(), 3);
    assert_eq!(r.fit_width("abc", 14).unwrap(), 2);
    assert_eq!(r.fit_width("abc", 0).unwrap(), 0);
    assert_eq!(r.fit_width("§cabc", 14).unwrap(), 4);
    assert_eq!(r.trim("§cabc", 14, false).unwrap(), "§cab");
    assert_eq!(r.trim("§cabc", 14, true).unwrap(), "bac§");
}

#[test]
fn test_overhanging_first_glyph_still_fits_full_width() {
    let provider = FixedAdvanceProvider {
        first_bearing: -2.0,
        ..FixedAdvanceProvider::default()
    };
    let mut r = StringRenderer::with_defaults(provider).unwrap();

    let width = r.measure("jab").unwrap();
    assert_eq!(width, 15);
    assert_eq!(r.fit_width("jab", width).unwrap(), 3);
    assert_eq!(r.fit_width("jab", width - 1).unwrap(), 2);

    let entry = r.get_or_layout("jab").unwrap();
    let total: i32 = entry.glyphs().iter().map(|g| g.advance).sum();
    assert_eq!(total, entry.advance());
    assert_eq!(entry.glyphs()[0].x, -2);

    let quads = draw(&mut r, "jab").textured_quads();
    assert_eq!(quads[0].x1, -1.0);
}

#[test]
fn test_fit_width_one_short_of_full_width() {
    let mut r = renderer();
    let width = r.measure("Hello").unwrap();
    let fit = r.fit_width("Hello", width - 1).unwrap();
    assert!((1..5).contains(&fit));
}

#[test]
fn test_trimmed_prefix_fits() {
    let mut r = renderer();
    let samples = ["Hello World", "§cred §lbold§r plain", "iiWWii", "ab אב", "x§"];
    for s in samples {
        let full = r.measure(s).unwrap();
        assert_eq!(r.fit_width(s, full).unwrap(), s.chars().count());

        for width in 0..60 {
            let trimmed = r.trim(s, width, false).unwrap();
            assert!(
                r.measure(&trimmed).unwrap() <= width,
                "{trimmed:?} is wider than {width}"
            );

            let reversed = r.trim(s, width, true).unwrap();
            assert_eq!(reversed, trimmed.chars().rev().collect::<String>());
        }
    }
}

// ============================================================================
// Drawing
// ============================================================================

#[test]
fn test_draw_offsets_by_position_and_baseline() {
    let mut r = renderer();
    let mut sink = RecordingSink::new();
    assert_eq!(r.draw("ab", 100.0, 50.0, WHITE, false, &mut sink).unwrap(), 10);

    let quads = sink.textured_quads();
    assert_eq!((quads[0].x1, quads[0].y1), (100.0, 50.0));
    assert_eq!((quads[1].x1, quads[1].x2), (105.0, 109.0));
}

#[test]
fn test_texture_rebound_only_on_change() {
    let mut r = renderer();
    assert_eq!(draw(&mut r, "abc").binds(), vec![Some(TextureId(1))]);
    assert_eq!(
        draw(&mut r, "abAB").binds(),
        vec![Some(TextureId(1)), Some(TextureId(2))]
    );
    assert_eq!(
        draw(&mut r, "aAa").binds(),
        vec![Some(TextureId(1)), Some(TextureId(2)), Some(TextureId(1))]
    );
}

#[test]
fn test_every_bind_is_preceded_by_flush() {
    let mut r = renderer();
    let sink = draw(&mut r, "aAa");
    for (i, event) in sink.events.iter().enumerate() {
        if matches!(event, SinkEvent::Bind(_)) {
            assert_eq!(sink.events[i - 1], SinkEvent::Flush);
            assert_eq!(sink.events[i + 1], SinkEvent::BeginBatch);
        }
    }
    assert_eq!(sink.events.last(), Some(&SinkEvent::Flush));
}

#[test]
fn test_shadow_uses_dark_palette() {
    let mut r = renderer();
    let mut sink = RecordingSink::new();
    r.draw("§fx", 1.0, 1.0, 0xff00_0000, true, &mut sink).unwrap();
    assert_eq!(sink.colors()[0], [0, 0, 0, 0xff]);
    assert!(sink.colors().contains(&[0x3f, 0x3f, 0x3f, 0xff]));
}

#[test]
fn test_color_code_keeps_caller_alpha() {
    let mut r = renderer();
    let mut sink = RecordingSink::new();
    r.draw("§cx", 0.0, 0.0, 0x80ff_ffff, false, &mut sink).unwrap();
    assert!(sink.colors().contains(&[0xff, 0x55, 0x55, 0x80]));
}

// ============================================================================
// Decorations
// ============================================================================

#[test]
fn test_underline_is_one_bar_across_glyphs() {
    let mut r = renderer();
    let entry = r.get_or_layout("§nAB").unwrap();
    assert!(entry.has_decorations());

    let sink = draw(&mut r, "§nAB");
    let bars = sink.solid_quads();
    assert_eq!(bars.len(), 1);
    assert_eq!((bars[0].x1, bars[0].x2), (-1.0, 10.0));
    assert_eq!((bars[0].y1, bars[0].y2), (7.5, 8.5));
    assert_eq!(sink.binds().last(), Some(&None));
}

#[test]
fn test_color_change_splits_underline() {
    let mut r = renderer();
    let sink = draw(&mut r, "§nA§c§nB");
    let bars = sink.solid_quads();
    assert_eq!(bars.len(), 2);
    assert_eq!((bars[0].x1, bars[0].x2), (-1.0, 5.0));
    assert_eq!((bars[1].x1, bars[1].x2), (4.0, 10.0));

    // The white bar is submitted before the color switches to red
    let first_bar = sink
        .events
        .iter()
        .position(|e| matches!(e, SinkEvent::Solid(_)))
        .expect("an underline bar");
    let red = sink
        .events
        .iter()
        .rposition(|e| *e == SinkEvent::Color(RED))
        .expect("red");
    assert!(first_bar < red);
}

#[test]
fn test_underline_continues_when_strikethrough_starts() {
    let mut r = renderer();
    let bars = draw(&mut r, "§nA§mB").solid_quads();
    assert_eq!(bars.len(), 2);
    assert_eq!((bars[0].x1, bars[0].x2, bars[0].y1), (-1.0, 10.0, 7.5));
    assert_eq!((bars[1].x1, bars[1].x2, bars[1].y1), (4.0, 10.0, 4.0));
}

#[test]
fn test_strikethrough_sits_above_baseline() {
    let mut r = renderer();
    let bars = draw(&mut r, "§mA").solid_quads();
    assert_eq!(bars.len(), 1);
    assert_eq!((bars[0].y1, bars[0].y2), (4.0, 5.0));

    assert_eq!(draw(&mut r, "§n§mA").solid_quads().len(), 2);
}

#[test]
fn test_decorations_stop_at_reset() {
    let mut r = renderer();
    assert_eq!(draw(&mut r, "§nA§rB").solid_quads().len(), 1);
}

#[test]
fn test_undecorated_string_has_no_solid_pass() {
    let mut r = renderer();
    let sink = draw(&mut r, "§cAB");
    assert!(sink.solid_quads().is_empty());
    assert!(!sink.binds().contains(&None));
}

#[test]
fn test_decoration_uses_code_color() {
    let mut r = renderer();
    // A color code clears decorations, so the color comes first
    let sink = draw(&mut r, "§c§nA");
    let first_bar = sink
        .events
        .iter()
        .position(|e| matches!(e, SinkEvent::Solid(_)))
        .expect("an underline bar");
    assert_eq!(sink.events[first_bar - 1], SinkEvent::Color(RED));
}

// ============================================================================
// Segmentation
// ============================================================================

#[test]
fn test_style_runs_split_only_on_font_style_change() {
    let mut r = renderer();
    r.provider_mut().shape_calls.clear();
    r.measure("a§lb§lc").unwrap();

    let calls: Vec<(FontId, String)> = r
        .provider()
        .shape_calls
        .iter()
        .map(|c| (c.font, c.text.clone()))
        .collect();
    assert_eq!(
        calls,
        vec![(FontId(0), "a".to_string()), (FontId(1), "bc".to_string())]
    );

    r.provider_mut().shape_calls.clear();
    r.measure("§cx§ey").unwrap();
    assert_eq!(r.provider().shape_calls.len(), 1);
}

#[test]
fn test_last_code_at_a_position_wins() {
    let mut r = renderer();
    r.provider_mut().shape_calls.clear();
    r.measure("§c§lx").unwrap();
    assert_eq!(r.provider().shape_calls[0].font, FontId(1));

    r.provider_mut().shape_calls.clear();
    r.measure("§l§cx").unwrap();
    assert_eq!(r.provider().shape_calls[0].font, FontId(0));
}

#[test]
fn test_unsupported_character_gets_its_own_segment() {
    let mut r = renderer();
    r.provider_mut().shape_calls.clear();
    assert_eq!(r.measure("a\u{E000}b").unwrap(), 15);

    let texts: Vec<&str> = r
        .provider()
        .shape_calls
        .iter()
        .map(|c| c.text.as_str())
        .collect();
    assert_eq!(texts, vec!["a", "\u{E000}", "b"]);
}

#[test]
fn test_mixed_direction_visual_order() {
    let mut r = renderer();
    r.provider_mut().shape_calls.clear();
    let entry = r.get_or_layout("ab אב").unwrap();
    assert_eq!(entry.advance(), 50);

    let positions: Vec<(usize, i32)> = entry
        .glyphs()
        .iter()
        .map(|g| (g.original_index, g.x))
        .collect();
    assert_eq!(positions, vec![(0, 0), (1, 10), (2, 20), (3, 40), (4, 30)]);

    let hebrew = &r.provider().shape_calls[1];
    assert_eq!(hebrew.font, HEBREW_FONT);
    assert!(hebrew.direction.is_rtl());
}

#[test]
fn test_rtl_only_string() {
    let mut r = renderer();
    let entry = r.get_or_layout("אב").unwrap();
    let positions: Vec<i32> = entry.glyphs().iter().map(|g| g.x).collect();
    assert_eq!(positions, vec![10, 0]);
}

// ============================================================================
// Errors and lifetimes
// ============================================================================

#[test]
fn test_provider_failure_caches_nothing() {
    let mut r = renderer();
    r.provider_mut().fail_on = Some('!');

    let result = r.measure("bad!");
    assert!(matches!(
        result,
        Err(LayoutError::Provider(ProviderError::Shaping { .. }))
    ));
    assert!(!r.cache_mut().contains("bad!"));

    r.provider_mut().fail_on = None;
    assert_eq!(r.measure("bad!").unwrap(), 20);
}

#[test]
fn test_bootstrap_failure_is_reported() {
    let provider = FixedAdvanceProvider {
        fail_on: Some('5'),
        ..FixedAdvanceProvider::default()
    };
    assert!(matches!(
        StringRenderer::with_defaults(provider),
        Err(LayoutError::Provider(_))
    ));
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut config = Config::default();
    config.palette.truncate(3);
    assert!(matches!(
        StringRenderer::new(FixedAdvanceProvider::new(), &config),
        Err(LayoutError::Config(_))
    ));
}

#[test]
fn test_retained_handle_survives_sweep() {
    let mut r = renderer_retaining_one();
    let handle = r.retain("kept").unwrap();
    r.measure("first").unwrap();
    r.measure("second").unwrap();

    r.cache_mut().release_recent();
    r.cache_mut().sweep();

    let cache = r.cache_mut();
    assert!(cache.contains("kept"));
    assert!(!cache.contains("first"));
    assert!(!cache.contains("second"));
    // Digit bootstrap layouts are pinned by the renderer
    assert!(cache.contains("0123456789"));
    assert_eq!(handle.as_str(), "kept");

    drop(handle);
    r.cache_mut().sweep();
    assert!(!r.cache_mut().contains("kept"));
}

#[test]
fn test_swept_layout_is_rebuilt_on_demand() {
    let mut r = renderer_retaining_one();
    r.measure("gone").unwrap();
    r.cache_mut().release_recent();
    assert_eq!(r.cache_mut().sweep(), 1);

    r.provider_mut().shape_calls.clear();
    assert_eq!(r.measure("gone").unwrap(), 20);
    assert_eq!(r.provider().shape_calls.len(), 1);
}

// ============================================================================
// Quad batching
// ============================================================================

#[test]
fn test_quad_batcher_receives_one_call_per_texture_run() {
    let mut r = renderer();
    let mut batcher = QuadBatcher::new();
    r.draw("§nabAB", 0.0, 0.0, WHITE, false, &mut batcher).unwrap();

    let calls: Vec<(Option<TextureId>, u32)> = batcher
        .draw_calls()
        .iter()
        .map(|c| (c.texture, c.vertex_count))
        .collect();
    assert_eq!(
        calls,
        vec![
            (Some(TextureId(1)), 12),
            (Some(TextureId(2)), 12),
            (None, 6)
        ]
    );

    batcher.clear();
    batcher.flush();
    assert!(batcher.draw_calls().is_empty());
}
