use arch::base4;
use arch::{ADDR_WIDTH, WORD_WIDTH};
use color_print::cformat;

use crate::label::SymbolKind;
use crate::Program;

const RULE: &str = "------+------------+-------+-----+------";

fn header(title: &str) -> String {
    format!("{}+------[{}]{}", "-".repeat(6), title, "-".repeat(40 - title.len().min(40)))
}

/// Source text of a 1-based line number.
fn source(lines: &[&str], line: usize) -> String {
    let raw = lines.get(line.wrapping_sub(1)).copied().unwrap_or("");
    raw.trim().to_string()
}

/// Listing of symbols, both images, entries and externs. `src` is the
/// text the program was assembled from.
pub fn dump(prog: &Program, src: &str) -> String {
    let lines: Vec<&str> = src.lines().collect();
    let mut out = vec![];

    out.push(header("symbols"));
    for (name, sym) in prog.symbols.iter() {
        let kind = match sym.kind {
            SymbolKind::Code => cformat!("<g>{:<8}</>", sym.kind),
            SymbolKind::Data => cformat!("<c>{:<8}</>", sym.kind),
            SymbolKind::External => cformat!("<y>{:<8}</>", sym.kind),
        };
        let entry = if prog.entries.contains(name) {
            cformat!(" <m>entry</>")
        } else {
            String::new()
        };
        out.push(format!(
            " {:>4} | {} {:<31} {}{}",
            sym.value(),
            kind,
            name,
            base4::encode(sym.value() as u32, ADDR_WIDTH),
            entry
        ));
    }

    out.push(header("code"));
    for word in &prog.image.code {
        let bits = word.bits();
        out.push(format!(
            " {:>4} | {:010b} | {} | {} | {}",
            word.addr,
            bits,
            base4::encode(bits as u32, WORD_WIDTH),
            cformat!("<y>{}</>", word.are),
            source(&lines, word.line)
        ));
    }

    out.push(header("data"));
    for word in &prog.image.data {
        let bits = word.bits();
        out.push(format!(
            " {:>4} | {:010b} | {} | {:>4} | {}",
            word.addr.value(),
            bits,
            base4::encode(bits as u32, WORD_WIDTH),
            word.value,
            source(&lines, word.line)
        ));
    }

    if !prog.entries.is_empty() {
        out.push(header("entries"));
        for (name, entry) in prog.entries.iter() {
            let at = entry
                .addr
                .map(|a| format!("{a:>4}"))
                .unwrap_or_else(|| "????".to_string());
            out.push(format!(" {} | {}", at, cformat!("<g>{}</>", name)));
        }
    }

    if !prog.externs.is_empty() {
        out.push(header("externs"));
        for (name, ext) in prog.externs.iter() {
            let uses: Vec<String> = ext.uses.iter().map(|u| u.to_string()).collect();
            out.push(format!(" {} | {}", cformat!("<y>{}</>", name), uses.join(", ")));
        }
    }
    out.push(RULE.to_string());
    out.join("\n")
}

pub fn print_dump(prog: &Program, src: &str) {
    println!("{}", dump(prog, src));
}

#[test]
fn test() {
    use crate::assemble;
    use crate::msg::Msgs;

    let src = "MAIN: inc r1 ; bump\n stop\nN: .data 7\n";
    let mut msgs = Msgs::new("test.am");
    let prog = assemble(src, &mut msgs).unwrap();
    let text = dump(&prog, src);
    let is_word = |l: &&str| {
        l.split(" | ")
            .nth(1)
            .is_some_and(|f| f.len() == 10 && f.bytes().all(|b| b == b'0' || b == b'1'))
    };
    let code: Vec<&str> = text.lines().filter(is_word).collect();
    assert_eq!(code.len(), 4);
    assert!(code[0].ends_with("| MAIN: inc r1 ; bump"));
    assert!(code[1].ends_with("| MAIN: inc r1 ; bump"));
    assert!(code[2].ends_with("| stop"));
    assert!(code[3].ends_with("| N: .data 7"));
}
