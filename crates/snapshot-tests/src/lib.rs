#![allow(missing_docs)]

use codespan_reporting::diagnostic::{Diagnostic, Label};
use toml_arena::{Iter, NodeKind};

pub type File<'s> = codespan_reporting::files::SimpleFile<&'static str, &'s str>;

pub fn emit_diags(
    f: &File<'_>,
    error: impl IntoIterator<Item = Diagnostic<()>>,
) -> String {
    let mut output = codespan_reporting::term::termcolor::NoColor::new(Vec::new());

    for diag in error {
        codespan_reporting::term::emit_to_write_style(
            &mut output,
            &codespan_reporting::term::Config::default(),
            f,
            &diag,
        )
        .expect("failed to emit diagnostic");
    }

    String::from_utf8(output.into_inner()).unwrap()
}

/// Parses `toml`, which must fail, and renders the error as a diagnostic
pub fn render_error(name: &'static str, toml: &str) -> String {
    let error = match toml_arena::parse_str(toml) {
        Ok(tree) => panic!("expected {name} to fail, parsed {tree:?}"),
        Err(error) => error,
    };
    let file = File::new(name, toml);
    emit_diags(&file, Some(error.to_diagnostic(())))
}

/// Collects a note diagnostic for every leaf reachable from `nodes`, labeled
/// with the leaf's span and coded with its kind
pub fn collect_spans(path: &str, nodes: Iter<'_>, diags: &mut Vec<Diagnostic<()>>) {
    for (i, node) in nodes.enumerate() {
        let here = match node.kind() {
            NodeKind::KeyValue => match node.key().and_then(|k| k.text()) {
                Some(key) => format!("{path}.{key}"),
                None => format!("{path}.?"),
            },
            NodeKind::Key => continue,
            _ => format!("{path}[{i}]"),
        };

        if node.kind().is_container() {
            collect_spans(&here, node.children(), diags);
            continue;
        }

        diags.push(
            Diagnostic::note()
                .with_code(node.kind().as_str())
                .with_message(here)
                .with_labels(vec![Label::primary((), node.span())]),
        );
    }
}

/// Parses `toml` and renders every leaf span as a note diagnostic
pub fn emit_spans(name: &'static str, toml: &str) -> String {
    let tree = toml_arena::parse_str(toml).expect("failed to parse toml");
    let mut spans = Vec::new();
    collect_spans("root", tree.iter(), &mut spans);

    let file = File::new(name, toml);
    emit_diags(&file, spans)
}

/// Asserts that the rendered diagnostic for an invalid document carries the
/// expected error code and label text
#[macro_export]
macro_rules! invalid {
    ($name:ident, $toml:expr, $code:literal, $label:literal) => {
        #[test]
        fn $name() {
            let rendered = $crate::render_error(stringify!($name), $toml);
            assert!(
                rendered.contains(concat!("error[", $code, "]")),
                "missing code in:\n{rendered}"
            );
            assert!(rendered.contains($label), "missing label in:\n{rendered}");
            assert!(
                rendered.contains(stringify!($name)),
                "missing file name in:\n{rendered}"
            );
        }
    };
}
