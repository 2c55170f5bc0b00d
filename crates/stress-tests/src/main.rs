use toml_arena::{Iter, Node, NodeKind};

#[derive(Clone, Debug)]
enum Expected {
    Leaf(NodeKind, String),
    Array(Vec<Expected>),
    Table(Vec<(String, Expected)>),
}

fn verify_entries(actual: Iter<'_>, expected: &[(String, Expected)], path: &str) {
    let mut count = 0;
    for (i, entry) in actual.enumerate() {
        let Some((key, exp_val)) = expected.get(i) else {
            panic!("{path}: extra entry {entry:?}");
        };
        let child = if path.is_empty() {
            key.clone()
        } else {
            format!("{path}.{key}")
        };
        assert_eq!(entry.kind(), NodeKind::KeyValue, "{child}: expected key-value");
        assert!(entry.span().is_empty(), "{child}: key-value carries data");

        let mut parts = entry.children();
        let value = parts
            .next()
            .unwrap_or_else(|| panic!("{child}: missing value"));
        let k = parts.next().unwrap_or_else(|| panic!("{child}: missing key"));
        assert!(parts.next().is_none(), "{child}: more than two children");

        assert_eq!(k.kind(), NodeKind::Key, "{child}: expected key");
        assert_eq!(k.data(), key.as_bytes(), "{child}: key mismatch");
        // children are allocated before their parent
        assert!(value.handle() < entry.handle(), "{child}: value after entry");
        assert!(k.handle() < entry.handle(), "{child}: key after entry");

        verify_node(value, exp_val, &child);
        count += 1;
    }
    assert_eq!(
        count,
        expected.len(),
        "{path}: entry count mismatch: actual={count}, expected={}",
        expected.len(),
    );
}

fn verify_node(actual: Node<'_>, expected: &Expected, path: &str) {
    match expected {
        Expected::Leaf(kind, text) => {
            assert_eq!(actual.kind(), *kind, "{path}: kind mismatch");
            assert_eq!(actual.text(), Some(text.as_str()), "{path}: text mismatch");
            assert_eq!(actual.children().count(), 0, "{path}: leaf has children");
        }
        Expected::Array(exp_items) => {
            assert_eq!(actual.kind(), NodeKind::Array, "{path}: expected array");
            let mut count = 0;
            for (i, item) in actual.children().enumerate() {
                let exp_item = exp_items
                    .get(i)
                    .unwrap_or_else(|| panic!("{path}: extra array element {item:?}"));
                verify_node(item, exp_item, &format!("{path}[{i}]"));
                count += 1;
            }
            assert_eq!(
                count,
                exp_items.len(),
                "{path}: array length mismatch: actual={count}, expected={}",
                exp_items.len(),
            );
        }
        Expected::Table(exp_entries) => {
            assert_eq!(
                actual.kind(),
                NodeKind::InlineTable,
                "{path}: expected inline table"
            );
            verify_entries(actual.children(), exp_entries, path);
        }
    }
}

fn write_fmt(s: &mut String, args: std::fmt::Arguments<'_>) {
    use std::fmt::Write;
    s.write_fmt(args).unwrap();
}

fn gen_simple_string(rng: &mut fastrand::Rng) -> String {
    let len = rng.usize(0..=25);
    let pool = b"abcdefghijklmnopqrstuvwxyz0123456789 -_.,=[]{}#";
    (0..len)
        .map(|_| pool[rng.usize(0..pool.len())] as char)
        .collect()
}

const KEY_BASES: &[&str] = &[
    "name", "cfg", "path", "src", "opt", "val", "item", "data", "meta", "port", "host", "mode",
    "tag", "kind", "level", "scope", "fmt", "key", "addr", "42",
];

fn gen_key(rng: &mut fastrand::Rng) -> String {
    let base = KEY_BASES[rng.usize(0..KEY_BASES.len())];
    match rng.u8(0..4) {
        0 => format!("{base}_z"),
        1 => format!("{base}-q"),
        2 => format!("{base}{}", rng.u8(0..100)),
        _ => base.to_string(),
    }
}

/// Inserts up to one underscore between digits.
fn sprinkle_underscores(rng: &mut fastrand::Rng, digits: &str) -> String {
    let mut out = String::new();
    let bytes = digits.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        out.push(*b as char);
        if i + 1 < bytes.len() && rng.u8(0..6) == 0 {
            out.push('_');
        }
    }
    out
}

fn gen_decimal(rng: &mut fastrand::Rng) -> String {
    let v = rng.u64(0..=u64::MAX / 2);
    sprinkle_underscores(rng, &v.to_string())
}

fn gen_sign(rng: &mut fastrand::Rng) -> &'static str {
    match rng.u8(0..4) {
        0 => "+",
        1 => "-",
        _ => "",
    }
}

fn gen_scalar(rng: &mut fastrand::Rng) -> (String, Expected) {
    let (toml, kind, text) = match rng.u8(0..12) {
        0 | 1 => {
            let s = format!("{}{}", gen_sign(rng), gen_decimal(rng));
            (s.clone(), NodeKind::Integer, s)
        }
        2 => {
            let (prefix, pool): (&str, &[u8]) = match rng.u8(0..3) {
                0 => ("0x", b"0123456789abcdefABCDEF"),
                1 => ("0o", b"01234567"),
                _ => ("0b", b"01"),
            };
            let digits: String = (0..rng.usize(1..=12))
                .map(|_| pool[rng.usize(0..pool.len())] as char)
                .collect();
            let s = format!("{prefix}{}", sprinkle_underscores(rng, &digits));
            (s.clone(), NodeKind::Integer, s)
        }
        3 | 4 => {
            let mut s = format!("{}{}", gen_sign(rng), gen_decimal(rng));
            if rng.bool() {
                write_fmt(&mut s, format_args!(".{}", gen_decimal(rng)));
                if rng.bool() {
                    let e = if rng.bool() { 'e' } else { 'E' };
                    write_fmt(&mut s, format_args!("{e}{}{}", gen_sign(rng), rng.u8(0..40)));
                }
            } else {
                write_fmt(&mut s, format_args!("e{}{}", gen_sign(rng), rng.u8(0..40)));
            }
            (s.clone(), NodeKind::Float, s)
        }
        5 => {
            let word = if rng.bool() { "inf" } else { "nan" };
            let s = format!("{}{word}", gen_sign(rng));
            (s.clone(), NodeKind::Float, s)
        }
        6 | 7 => {
            let s = rng.bool().to_string();
            (s.clone(), NodeKind::Bool, s)
        }
        8 | 9 => {
            let s = gen_simple_string(rng);
            (format!("\"{s}\""), NodeKind::String, s)
        }
        10 => {
            let s = gen_simple_string(rng);
            (format!("'{s}'"), NodeKind::String, s)
        }
        _ => {
            // escapes are kept verbatim
            let base = gen_simple_string(rng);
            let escapes = ["\\n", "\\t", "\\\\", "\\\"", "\\u00E9"];
            let s = format!("{base}{}", escapes[rng.usize(0..escapes.len())]);
            (format!("\"{s}\""), NodeKind::String, s)
        }
    };
    (toml, Expected::Leaf(kind, text))
}

fn gen_value(rng: &mut fastrand::Rng, depth: usize) -> (String, Expected) {
    if depth == 0 {
        return gen_scalar(rng);
    }
    match rng.u8(0..6) {
        0 => gen_inline_table_val(rng, depth - 1),
        1 => gen_array_val(rng, depth - 1),
        _ => gen_scalar(rng),
    }
}

fn gen_inline_table_val(rng: &mut fastrand::Rng, depth: usize) -> (String, Expected) {
    let n = rng.usize(0..=6);
    let mut parts_toml = Vec::new();
    let mut parts_exp = Vec::new();
    for _ in 0..n {
        let key = gen_key(rng);
        let (v_toml, v_exp) = gen_value(rng, depth);
        let eq = if rng.bool() { " = " } else { "=" };
        parts_toml.push(format!("{key}{eq}{v_toml}"));
        parts_exp.push((key, v_exp));
    }
    let sep = if rng.bool() { ", " } else { "," };
    (
        format!("{{ {} }}", parts_toml.join(sep)),
        Expected::Table(parts_exp),
    )
}

fn gen_array_gap(rng: &mut fastrand::Rng) -> &'static str {
    match rng.u8(0..6) {
        0 => "\n",
        1 => "\r\n  ",
        2 => "\t",
        3 => "",
        _ => " ",
    }
}

fn gen_array_val(rng: &mut fastrand::Rng, depth: usize) -> (String, Expected) {
    let n = rng.usize(0..=8);
    let mut toml = String::from("[");
    let mut parts_exp = Vec::new();
    for i in 0..n {
        let (v_toml, v_exp) = gen_value(rng, depth);
        let gap = gen_array_gap(rng);
        write_fmt(&mut toml, format_args!("{gap}{v_toml}{gap}"));
        if i + 1 < n || rng.u8(0..3) == 0 {
            toml.push(',');
        }
        parts_exp.push(v_exp);
    }
    toml.push_str(gen_array_gap(rng));
    toml.push(']');
    (toml, Expected::Array(parts_exp))
}

fn gen_document(rng: &mut fastrand::Rng) -> (String, Vec<(String, Expected)>) {
    let mut toml = String::new();
    let mut root_exp = Vec::new();

    let n_root = rng.usize(0..=12);
    for _ in 0..n_root {
        // blank lines between statements
        for _ in 0..rng.usize(0..=2) {
            toml.push_str(if rng.bool() { "\n" } else { "  \r\n" });
        }

        let key = gen_key(rng);
        let (val_toml, val_exp) = gen_value(rng, 3);
        let indent = if rng.u8(0..4) == 0 { "\t" } else { "" };
        write_fmt(&mut toml, format_args!("{indent}{key} = {val_toml}\n"));
        root_exp.push((key, val_exp));
    }

    (toml, root_exp)
}

fn main() {
    let total_iterations: u64 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(500_000);

    let mut rng = fastrand::Rng::new();
    let mut total_tests = 0u64;

    for seed in 0..total_iterations {
        rng.seed(seed);
        let (toml_text, expected) = gen_document(&mut rng);

        let tree = match toml_arena::parse_str(&toml_text) {
            Ok(r) => r,
            Err(e) => {
                panic!(
                    "\n============= PARSE ERROR ===============\n\
                     Seed:     {seed}\n\
                     Input ({} bytes):\n{toml_text}\n\
                     Error: {e}\n\
                     ============================================",
                    toml_text.len(),
                );
            }
        };

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            verify_entries(tree.iter(), &expected, "");
        }));

        if let Err(panic_info) = result {
            let msg = if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else if let Some(s) = panic_info.downcast_ref::<&str>() {
                s.to_string()
            } else {
                "unknown panic".to_string()
            };
            panic!(
                "\n============== MISMATCH =============\n\
                 Seed:     {seed}\n\
                 Input ({} bytes):\n{toml_text}\n\
                 Error: {msg}\n\
                 ========================================",
                toml_text.len(),
            );
        }

        // truncating a document must never panic
        let cut = rng.usize(0..=toml_text.len());
        let _ = toml_arena::parse(&toml_text.as_bytes()[..cut]);

        total_tests += 1;

        if seed % 50_000 == 0 && seed > 0 {
            eprintln!("Progress: {seed}/{total_iterations} seeds ({total_tests} tests)");
        }
    }
    eprintln!("All {total_iterations} seeds passed ({total_tests} tests).");
}
