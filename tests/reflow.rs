use hwpx_fill::layout::{LayoutConstants, char_weight, text_weight, wrap_points};
use hwpx_fill::model::{LineSegment, LineSegmentArray, Paragraph, Run};
use hwpx_fill::reflow::{CONTINUATION_FLAGS, reflow, wrap_segments};

const LABEL: &str = "주   소   지  :  ";
const LONG_ADDRESS: &str =
    "서울특별시 강남구 테헤란로 123, 456호 (삼성동, 대한민국빌딩 별관 지하 2층 101호)";

fn seg(vertpos: i64) -> LineSegment {
    LineSegment {
        textpos: 0,
        vertpos,
        horzpos: 750,
        horzsize: 44606,
        flags: Some("393216".to_string()),
        extra: vec![
            ("vertsize".to_string(), "1000".to_string()),
            ("baseline".to_string(), "850".to_string()),
        ],
    }
}

fn para(text: &str, segments: Vec<LineSegment>) -> Paragraph {
    Paragraph {
        runs: vec![Run {
            text: Some(text.to_string()),
        }],
        line_segments: Some(LineSegmentArray {
            segments,
            declared_size: None,
        }),
    }
}

fn address(text: &str, vertpos: i64) -> Paragraph {
    para(&format!("{LABEL}{text}"), vec![seg(vertpos)])
}

fn vertposes(p: &Paragraph) -> Vec<i64> {
    p.segments().iter().map(|s| s.vertpos).collect()
}

#[test]
fn hangul_weighs_more_than_latin() {
    assert_eq!(char_weight('가'), 2.0);
    assert_eq!(char_weight('힣'), 2.0);
    assert_eq!(char_weight('\u{1100}'), 2.0);
    assert_eq!(char_weight('A'), 1.1);
    assert_eq!(char_weight('漢'), 1.1);
    assert!((text_weight("강남 1") - 6.2).abs() < 1e-9);
}

#[test]
fn short_address_keeps_its_single_line() {
    let constants = LayoutConstants::default();
    let mut paragraphs = vec![address("서울특별시 강남구 테헤란로 123, 456호 (삼성동)", 8960)];

    let report = reflow(&mut paragraphs, &constants).unwrap();

    assert_eq!(report.address_index, 0);
    assert_eq!(report.line_count, 1);
    let array = paragraphs[0].line_segments.as_ref().unwrap();
    assert_eq!(array.segments, vec![seg(8960)]);
    assert_eq!(array.declared_size, Some(1));
}

#[test]
fn long_address_wraps_at_space_with_hanging_indent() {
    let constants = LayoutConstants::default();
    let mut paragraphs = vec![address(LONG_ADDRESS, 8960)];

    reflow(&mut paragraphs, &constants).unwrap();

    let segments = paragraphs[0].segments();
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0], seg(8960));

    let text: Vec<char> = format!("{LABEL}{LONG_ADDRESS}").chars().collect();
    let second = &segments[1];
    assert_eq!(second.textpos, 52);
    assert_eq!(text[51], ' ');
    assert_eq!(text[52], '별');
    assert_eq!(second.vertpos, 8960 + 2240);
    assert_eq!(second.horzpos, 750 + 8921);
    assert_eq!(second.horzsize, 44606 - 8921);
    assert_eq!(second.flags.as_deref(), Some(CONTINUATION_FLAGS));
    assert_eq!(second.extra, seg(0).extra);
    assert_eq!(
        paragraphs[0].line_segments.as_ref().unwrap().declared_size,
        Some(2)
    );
}

#[test]
fn breaks_before_an_open_paren() {
    let constants = LayoutConstants::default();
    let text = format!("{LABEL}{}({})", "가".repeat(25), "나".repeat(10));
    let chars: Vec<char> = text.chars().collect();

    let points = wrap_points(&text, &constants);

    assert_eq!(points, vec![0, 39]);
    assert_eq!(chars[39], '(');
}

#[test]
fn cuts_raw_when_no_break_character_is_near() {
    let constants = LayoutConstants::default();
    let text = format!("{LABEL}{}", "가".repeat(60));
    assert_eq!(wrap_points(&text, &constants), vec![0, 45]);
}

#[test]
fn wrap_points_cover_the_text_without_gaps() {
    let constants = LayoutConstants::default();
    let samples = [
        format!("{LABEL}{LONG_ADDRESS}"),
        format!("{LABEL}{LONG_ADDRESS} {LONG_ADDRESS}"),
        format!("{LABEL}경기도 성남시 분당구 판교역로 235, [에이치스퀘어 N동] 7층 (삼평동)"),
        "Flat 4, 221B Baker Street, Marylebone, London NW1 6XE, United Kingdom of Great Britain".to_string(),
        format!("{LABEL}{}", "동 ".repeat(80)),
        "x".to_string(),
    ];

    for text in &samples {
        let chars: Vec<char> = text.chars().collect();
        let points = wrap_points(text, &constants);

        assert_eq!(points[0], 0, "{text}");
        assert!(points.windows(2).all(|w| w[0] < w[1]), "{text}: {points:?}");
        assert!(*points.last().unwrap() < chars.len(), "{text}: {points:?}");
        for &cut in &points[1..] {
            assert_ne!(chars[cut], ' ', "continuation starts with a space in {text}");
            assert!(
                chars[cut - 1] == ' ' || matches!(chars[cut], '(' | ',' | '['),
                "{text}: cut {cut} is not at a break character"
            );
        }
    }
}

#[test]
fn continuation_lines_stack_strictly_downward() {
    let constants = LayoutConstants::default();
    let text = format!("{LABEL}{}", "서울 강남 ".repeat(40));
    let segments = wrap_segments(&text, &seg(1000), &constants);

    assert!(segments.len() > 3);
    assert!(segments.windows(2).all(|w| w[0].vertpos < w[1].vertpos));
    assert!(segments.windows(2).all(|w| w[0].textpos < w[1].textpos));
    assert!(segments[1..].iter().all(|s| s.horzpos == 750 + 8921));
}

#[test]
fn stalled_wrap_emits_a_single_line() {
    let constants = LayoutConstants {
        label_weight: 100.0,
        ..LayoutConstants::default()
    };
    let text = format!("{LABEL}{LONG_ADDRESS}");
    assert_eq!(wrap_points(&text, &constants), vec![0]);
}

#[test]
fn following_paragraphs_cascade_below_the_address() {
    let constants = LayoutConstants::default();
    let mut paragraphs = vec![
        address("서울특별시 강남구", 0),
        para("용역기간", vec![seg(0)]),
        para("용역내용", vec![seg(0)]),
        para("용도", vec![seg(0)]),
    ];

    let report = reflow(&mut paragraphs, &constants).unwrap();

    assert_eq!(report.shifted_paragraphs, 3);
    assert_eq!(vertposes(&paragraphs[1]), vec![3640]);
    assert_eq!(vertposes(&paragraphs[2]), vec![7280]);
    assert_eq!(vertposes(&paragraphs[3]), vec![10920]);
    for pair in paragraphs.windows(2) {
        let bottom = pair[0].footprint(constants.line_extent).unwrap();
        assert!(pair[1].min_vertpos().unwrap() >= bottom + constants.paragraph_clearance);
    }
}

#[test]
fn shift_moves_a_paragraph_as_a_block_and_never_up() {
    let constants = LayoutConstants::default();
    let mut paragraphs = vec![
        address(LONG_ADDRESS, 8960),
        para("두 줄 문단", vec![seg(11200), seg(13440)]),
        para("멀리 있는 문단", vec![seg(60000)]),
        para("바로 뒤 문단", vec![seg(50000)]),
    ];

    reflow(&mut paragraphs, &constants).unwrap();

    // Address now ends at 11200 + 1400; next start is 12600 + 2240.
    assert_eq!(vertposes(&paragraphs[1]), vec![14840, 17080]);
    assert_eq!(vertposes(&paragraphs[2]), vec![60000]);
    assert_eq!(vertposes(&paragraphs[3]), vec![60000 + 1400 + 2240]);
}

#[test]
fn paragraphs_without_segments_are_passed_through() {
    let constants = LayoutConstants::default();
    let bare = Paragraph {
        runs: vec![Run { text: None }],
        line_segments: None,
    };
    let empty = Paragraph {
        runs: vec![],
        line_segments: Some(LineSegmentArray::default()),
    };
    let mut paragraphs = vec![
        address("서울", 0),
        bare.clone(),
        empty.clone(),
        para("다음", vec![seg(0)]),
    ];

    let report = reflow(&mut paragraphs, &constants).unwrap();

    assert_eq!(report.shifted_paragraphs, 1);
    assert_eq!(paragraphs[1], bare);
    assert_eq!(paragraphs[2], empty);
    assert_eq!(vertposes(&paragraphs[3]), vec![3640]);
}

#[test]
fn only_the_first_labelled_paragraph_is_rewrapped() {
    let constants = LayoutConstants::default();
    let before = para("신청인 : 홍길동", vec![seg(0)]);
    let mut paragraphs = vec![
        before.clone(),
        address("서울", 4480),
        address(LONG_ADDRESS, 0),
    ];

    let report = reflow(&mut paragraphs, &constants).unwrap();

    assert_eq!(report.address_index, 1);
    assert_eq!(paragraphs[0], before);
    assert_eq!(paragraphs[2].segments().len(), 1);
    assert_eq!(vertposes(&paragraphs[2]), vec![4480 + 1400 + 2240]);
}

#[test]
fn address_without_segments_still_cascades_from_the_top() {
    let constants = LayoutConstants::default();
    let mut paragraphs = vec![
        Paragraph {
            runs: vec![Run {
                text: Some(format!("{LABEL}서울")),
            }],
            line_segments: None,
        },
        para("다음", vec![seg(0)]),
    ];

    let report = reflow(&mut paragraphs, &constants).unwrap();

    assert_eq!(report.line_count, 0);
    assert_eq!(vertposes(&paragraphs[1]), vec![2240]);
}

#[test]
fn no_address_label_means_no_change() {
    let constants = LayoutConstants::default();
    let paragraphs = vec![para("용역기간", vec![seg(0)]), para("용도", vec![seg(0)])];
    let mut after = paragraphs.clone();

    assert!(reflow(&mut after, &constants).is_none());
    assert_eq!(after, paragraphs);
}

#[test]
fn extreme_positions_saturate_instead_of_overflowing() {
    let constants = LayoutConstants::default();
    let mut paragraphs = vec![
        address(LONG_ADDRESS, i64::MAX - 100),
        para("아래 문단", vec![seg(0)]),
        para("맨 아래 문단", vec![seg(i64::MIN)]),
    ];

    let report = reflow(&mut paragraphs, &constants).unwrap();

    assert_eq!(report.line_count, 2);
    assert_eq!(vertposes(&paragraphs[0]), vec![i64::MAX - 100, i64::MAX]);
    assert_eq!(vertposes(&paragraphs[1]), vec![i64::MAX]);
    assert!(paragraphs[2].min_vertpos().unwrap() > i64::MIN);
    assert_eq!(paragraphs[0].footprint(constants.line_extent), Some(i64::MAX));
}
