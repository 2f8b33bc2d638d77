//! End-to-end conversion tests over derived records.

use std::collections::{BTreeMap, HashMap};

use deepconv::{Convert, ConvertError, Value, convert, json};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn object(entries: Vec<(&str, Value)>) -> Value {
    entries.into_iter().collect()
}

#[derive(Convert, Default, Debug, Clone, PartialEq)]
struct Item {
    id: String,
    title: String,
}

#[derive(Convert, Default, Debug, Clone, PartialEq)]
struct Page {
    items: Vec<Item>,
    token: String,
}

#[derive(Convert, Default, Debug, PartialEq)]
struct Track {
    id: String,
    title: String,
}

#[derive(Convert, Default, Debug)]
struct Listing {
    #[convert(path = "/items")]
    items: Vec<Track>,
    #[convert(path = "/token")]
    page_token: String,
}

fn sample_page() -> Page {
    Page {
        items: vec![
            Item {
                id: "1".into(),
                title: "x".into(),
            },
            Item {
                id: "2".into(),
                title: "y".into(),
            },
        ],
        token: "abc".into(),
    }
}

#[test]
fn items_and_token_scenario() {
    init_tracing();
    let mut listing = Listing::default();
    convert(&mut listing, &sample_page()).expect("convert page");

    assert_eq!(listing.items.len(), 2);
    assert_eq!(listing.items[0].id, "1");
    assert_eq!(listing.items[0].title, "x");
    assert_eq!(listing.items[1].id, "2");
    assert_eq!(listing.items[1].title, "y");
    assert_eq!(listing.page_token, "abc");
}

#[derive(Convert, Default, Debug, Clone, PartialEq)]
struct Inner {
    value: i32,
    label: Option<String>,
}

#[derive(Convert, Default, Debug, Clone, PartialEq)]
struct Everything {
    flag: bool,
    small: u8,
    ratio: f64,
    letter: char,
    name: String,
    inner: Option<Inner>,
    boxed: Box<Inner>,
    list: Vec<Inner>,
    pair: [u16; 2],
    by_name: HashMap<String, Vec<i64>>,
    by_id: BTreeMap<u32, String>,
    open: Value,
}

fn sample_everything() -> Everything {
    Everything {
        flag: true,
        small: 200,
        ratio: 0.25,
        letter: 'q',
        name: "everything".into(),
        inner: Some(Inner {
            value: -4,
            label: None,
        }),
        boxed: Box::new(Inner {
            value: 9,
            label: Some("boxed".into()),
        }),
        list: vec![
            Inner {
                value: 1,
                label: Some("one".into()),
            },
            Inner::default(),
        ],
        pair: [7, 8],
        by_name: HashMap::from([("a".to_string(), vec![1, 2, 3]), ("b".to_string(), vec![])]),
        by_id: BTreeMap::from([(1, "first".to_string()), (20, "twentieth".to_string())]),
        open: Value::from("open"),
    }
}

#[test]
fn matching_records_copy_every_field() {
    let src = sample_everything();
    let mut dst = Everything::default();
    convert(&mut dst, &src).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn converting_twice_is_idempotent() {
    let src = sample_everything();
    let mut dst = Everything::default();
    convert(&mut dst, &src).unwrap();
    let once = dst.clone();
    convert(&mut dst, &src).unwrap();
    assert_eq!(dst, once);
}

#[derive(Convert, Default, Debug)]
struct Pair {
    x: i32,
    y: i32,
}

#[derive(Convert, Default)]
struct OnlyY {
    y: i32,
}

#[test]
fn absent_source_path_leaves_field_untouched() {
    let mut dst = Pair { x: 5, y: 0 };
    convert(&mut dst, &OnlyY { y: 3 }).unwrap();
    assert_eq!(dst.x, 5);
    assert_eq!(dst.y, 3);

    convert(&mut dst, &object(vec![("z", Value::Int(1))])).unwrap();
    assert_eq!((dst.x, dst.y), (5, 3));
}

#[test]
fn explicit_null_zeroes_the_field() {
    let mut dst = Pair { x: 5, y: 6 };
    convert(&mut dst, &object(vec![("x", Value::Null)])).unwrap();
    assert_eq!((dst.x, dst.y), (0, 6));
}

#[derive(Convert, Default, Debug, PartialEq)]
struct Holder {
    inner: Option<Inner>,
}

#[test]
fn absent_indirect_is_allocated_for_present_source() {
    let src = Holder {
        inner: Some(Inner {
            value: 3,
            label: Some("l".into()),
        }),
    };
    let mut dst = Holder::default();
    convert(&mut dst, &src).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn absent_indirect_stays_absent_for_absent_source() {
    let mut dst = Holder::default();
    convert(&mut dst, &Holder::default()).unwrap();
    assert_eq!(dst.inner, None);
}

#[test]
fn open_null_allocates_absent_indirect() {
    let mut dst = Holder::default();
    convert(&mut dst, &object(vec![("inner", Value::Null)])).unwrap();
    assert_eq!(dst.inner, Some(Inner::default()));
}

#[test]
fn present_indirect_is_reused() {
    let mut dst = Holder {
        inner: Some(Inner {
            value: 1,
            label: Some("keep".into()),
        }),
    };
    convert(&mut dst, &object(vec![("inner", object(vec![("value", Value::Int(2))]))])).unwrap();
    assert_eq!(
        dst.inner,
        Some(Inner {
            value: 2,
            label: Some("keep".into()),
        })
    );
}

#[test]
fn sequences_grow_to_source_length() {
    let mut dst = vec![9u8, 9];
    convert(&mut dst, &vec![1u8, 2, 3, 4]).unwrap();
    assert_eq!(dst, vec![1, 2, 3, 4]);

    let mut dst = vec![9u8, 9, 9, 9, 9];
    convert(&mut dst, &vec![1u8, 2]).unwrap();
    assert_eq!(dst, vec![1, 2, 9, 9, 9]);
}

#[test]
fn sparse_integer_mapping_preserves_untouched_elements() {
    let mut dst = vec![1u8, 2];
    convert(&mut dst, &BTreeMap::from([(4i64, 7u8)])).unwrap();
    assert_eq!(dst, vec![1, 2, 0, 0, 7]);
}

#[test]
fn fixed_arrays_overflow() {
    let mut dst = [0u8; 2];
    let err = convert(&mut dst, &vec![1u8, 2, 3]).unwrap_err();
    assert!(matches!(
        err,
        ConvertError::SequenceOverflow {
            index: 2,
            len: 2,
            ..
        }
    ));
    assert_eq!(err.location(), Some("/2"));
}

#[test]
fn string_keys_are_retyped() {
    let mut dst: HashMap<i32, String> = HashMap::new();
    convert(&mut dst, &HashMap::from([("3".to_string(), "x".to_string())])).unwrap();
    assert_eq!(dst.get(&3).map(String::as_str), Some("x"));

    let err = convert(&mut dst, &HashMap::from([("abc".to_string(), "x".to_string())])).unwrap_err();
    match err {
        ConvertError::InconvertibleKey { key, key_type, .. } => {
            assert_eq!(key, deepconv::Key::from("abc"));
            assert_eq!(key_type, "i32");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn integer_keys_render_as_strings() {
    let mut dst: BTreeMap<String, bool> = BTreeMap::new();
    convert(&mut dst, &BTreeMap::from([(10u64, true)])).unwrap();
    assert_eq!(dst, BTreeMap::from([("10".to_string(), true)]));
}

#[derive(Convert, Default, Debug)]
struct Routed {
    #[convert(path = "/a/b")]
    value: String,
    #[convert(path = ".list.1")]
    second: u32,
}

#[test]
fn path_annotations_route_reads() {
    let src = object(vec![
        ("a", object(vec![("b", Value::from("deep"))])),
        ("value", Value::from("shallow")),
        ("/", Value::from("separator")),
        ("list", Value::Array(vec![Value::Int(10), Value::Int(20)])),
    ]);
    let mut dst = Routed::default();
    convert(&mut dst, &src).unwrap();
    assert_eq!(dst.value, "deep");
    assert_eq!(dst.second, 20);
}

#[test]
fn path_annotations_route_writes() {
    let src = Routed {
        value: "v".into(),
        second: 3,
    };
    let mut dst = Value::Null;
    convert(&mut dst, &src).unwrap();

    assert_eq!(
        deepconv::mappath::get(&dst, "/a/b"),
        Some(&Value::from("v"))
    );
    assert_eq!(
        dst.field("list").and_then(|list| list.get(&deepconv::Key::Int(1))),
        Some(&Value::UInt(3))
    );
    assert!(dst.field("list").and_then(Value::as_table).is_some());
}

#[derive(Convert, Default, Debug)]
struct Secretive {
    name: String,
    #[convert(path = "-")]
    secret: String,
    #[convert(skip)]
    hidden: u8,
}

#[test]
fn ignored_fields_are_never_written() {
    let src = object(vec![
        ("name", Value::from("n")),
        ("secret", Value::from("s")),
        ("hidden", Value::Int(1)),
    ]);
    let mut dst = Secretive {
        secret: "kept".into(),
        ..Default::default()
    };
    convert(&mut dst, &src).unwrap();
    assert_eq!(dst.name, "n");
    assert_eq!(dst.secret, "kept");
    assert_eq!(dst.hidden, 0);
}

#[test]
fn ignored_fields_are_never_read() {
    let src = Secretive {
        name: "n".into(),
        secret: "s".into(),
        hidden: 4,
    };
    let mut dst = Value::Null;
    convert(&mut dst, &src).unwrap();
    assert_eq!(dst, object(vec![("name", Value::from("n"))]));
}

#[derive(Convert, Default)]
struct Renamed {
    #[convert(path = "/y")]
    x: u8,
}

#[derive(Convert, Default)]
struct Target {
    #[convert(path = "/x")]
    f: u8,
}

#[test]
fn destination_annotations_win_between_records() {
    let mut dst = Target::default();
    convert(&mut dst, &Renamed { x: 42 }).unwrap();
    assert_eq!(dst.f, 42);
}

#[test]
fn scalar_source_is_not_addressable_by_record_paths() {
    let mut dst = Routed::default();
    let err = convert(&mut dst, &Value::Int(3)).unwrap_err();
    assert!(matches!(err, ConvertError::Unaddressable { .. }));
    assert_eq!(err.location(), Some("/a"));
}

#[test]
fn incompatible_scalars_fail() {
    let mut dst = Pair::default();
    let err = convert(&mut dst, &object(vec![("x", Value::from("five"))])).unwrap_err();
    assert!(matches!(err, ConvertError::IncompatibleScalar { .. }));
    assert_eq!(err.location(), Some("/x"));
}

#[test]
fn open_destinations_become_keyed_maps() {
    let mut from_record = Value::Null;
    convert(&mut from_record, &Pair { x: 1, y: 2 }).unwrap();
    assert_eq!(
        from_record,
        object(vec![("x", Value::Int(1)), ("y", Value::Int(2))])
    );

    let mut from_sequence = Value::Null;
    convert(&mut from_sequence, &vec![true]).unwrap();
    assert_eq!(
        from_sequence,
        Value::Table(BTreeMap::from([(0, Value::Bool(true))]))
    );

    let mut from_int_map = Value::Null;
    convert(&mut from_int_map, &HashMap::from([(5u16, 'c')])).unwrap();
    assert_eq!(
        from_int_map,
        Value::Table(BTreeMap::from([(5, Value::from("c"))]))
    );

    let mut from_str_map = Value::Null;
    convert(&mut from_str_map, &BTreeMap::from([("k".to_string(), 1.5f32)])).unwrap();
    assert_eq!(from_str_map, object(vec![("k", Value::Float(1.5))]));
}

#[derive(Convert, Default, Debug, PartialEq)]
struct Node {
    value: i32,
    next: Option<Box<Node>>,
}

#[test]
fn self_referential_records() {
    let src = object(vec![
        ("value", Value::Int(1)),
        (
            "next",
            object(vec![
                ("value", Value::Int(2)),
                ("next", object(vec![("value", Value::Int(3))])),
            ]),
        ),
    ]);
    let mut dst = Node::default();
    convert(&mut dst, &src).unwrap();

    let values: Vec<i32> = std::iter::successors(Some(&dst), |node| node.next.as_deref())
        .map(|node| node.value)
        .collect();
    assert_eq!(values, vec![1, 2, 3]);
}

#[derive(Convert, Default, Debug)]
struct Keyword {
    r#type: String,
}

#[test]
fn raw_identifiers_use_their_plain_name() {
    let mut dst = Keyword::default();
    convert(&mut dst, &object(vec![("type", Value::from("audio"))])).unwrap();
    assert_eq!(dst.r#type, "audio");
}

#[derive(Convert, Default, Debug)]
struct Wrapper<T> {
    payload: T,
    tag: String,
}

#[test]
fn generic_records() {
    let mut dst: Wrapper<Vec<u8>> = Wrapper::default();
    convert(
        &mut dst,
        &object(vec![
            ("payload", Value::Array(vec![Value::Int(1), Value::Int(2)])),
            ("tag", Value::from("t")),
        ]),
    )
    .unwrap();
    assert_eq!(dst.payload, vec![1, 2]);
    assert_eq!(dst.tag, "t");
}

#[derive(Convert, Default, Debug, PartialEq)]
struct Upload {
    #[convert(path = "/external/name")]
    name: String,
    #[convert(path = "/inlined/UploaderId")]
    uploader_id: String,
    #[convert(path = "/inlined/TrackBitRate")]
    track_bit_rate: i32,
    #[convert(path = "/inlined/SyncNow")]
    sync_now: bool,
    #[convert(path = "/inlined/Genres")]
    genres: Vec<String>,
}

#[test]
fn json_round_trip_through_records() {
    init_tracing();
    let upload = Upload {
        name: "session".into(),
        uploader_id: "00:11:22".into(),
        track_bit_rate: 320,
        sync_now: true,
        genres: (0..12).map(|i| format!("g{i}")).collect(),
    };

    let bytes = json::encode(&upload).unwrap();
    let tree: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(tree["external"]["name"], "session");
    assert_eq!(tree["inlined"]["TrackBitRate"], 320);
    assert_eq!(tree["inlined"]["Genres"]["11"], "g11");

    let mut decoded = Upload::default();
    json::decode_into(&mut decoded, &bytes).unwrap();
    assert_eq!(decoded, upload);
}

#[test]
fn json_arrays_decode_into_sequences() {
    let mut page = Page::default();
    json::decode_into(
        &mut page,
        br#"{"items": [{"id": "1", "title": "x"}, {"id": "2"}], "token": "abc"}"#,
    )
    .unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[1].id, "2");
    assert_eq!(page.items[1].title, "");
    assert_eq!(page.token, "abc");
}
