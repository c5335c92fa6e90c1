use arch::base4;
use arch::{ADDR_WIDTH, IC_BASE, OBJECT_WORD_LIMIT, WORD_WIDTH};
use std::io::Write;

use crate::error::Error;
use crate::Program;

/// Rendered contents of the output files of one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub ob: String,
    /// Present only if the file declares entries.
    pub ent: Option<String>,
    /// Present only if some external symbol is used.
    pub ext: Option<String>,
}

fn addr(v: u16) -> String {
    base4::encode(v as u32, ADDR_WIDTH)
}

/// Largest object the address width can describe.
pub fn object_limit() -> usize {
    (base4::max_value(ADDR_WIDTH) as usize).min(OBJECT_WORD_LIMIT)
}

pub fn render(prog: &Program) -> Result<Output, Error> {
    let code = prog.image.code_len();
    let data = prog.image.data_len();
    let limit = object_limit();
    if code + data > limit {
        return Err(Error::ObjectTooLarge(code + data, code, data, limit));
    }

    let code_count = prog.image.ic.saturating_sub(IC_BASE) as u32;
    let mut ob = format!(
        "\t{}\t{}\n",
        base4::encode_var(code_count),
        base4::encode_var(prog.image.dc as u32)
    );
    for word in &prog.image.code {
        let bits = base4::encode(word.bits() as u32, WORD_WIDTH);
        ob.push_str(&format!("{} {}\n", addr(word.addr), bits));
    }
    for word in &prog.image.data {
        let bits = base4::encode(word.bits() as u32, WORD_WIDTH);
        ob.push_str(&format!("{} {}\n", addr(word.addr.value()), bits));
    }

    let ent = if prog.entries.is_empty() {
        None
    } else {
        let mut s = String::new();
        for (name, entry) in prog.entries.iter() {
            s.push_str(&format!("{} {}\n", name, addr(entry.addr.unwrap_or(0))));
        }
        Some(s)
    };

    let ext = if prog.externs.any_use() {
        let mut s = String::new();
        for (name, ext) in prog.externs.iter() {
            for at in &ext.uses {
                s.push_str(&format!("{} {}\n", name, addr(*at)));
            }
        }
        Some(s)
    } else {
        None
    };

    Ok(Output { ob, ent, ext })
}

/// Paths and contents that `write` will create for `stem`.
pub fn files(stem: &str, out: &Output) -> Vec<(String, String)> {
    let mut files = vec![(format!("{stem}.ob"), out.ob.clone())];
    if let Some(ent) = &out.ent {
        files.push((format!("{stem}.ent"), ent.clone()));
    }
    if let Some(ext) = &out.ext {
        files.push((format!("{stem}.ext"), ext.clone()));
    }
    files
}

/// Removes output files left by an earlier run. Missing files are fine.
pub fn clean(stem: &str) {
    for ext in ["ob", "ent", "ext"] {
        let path = format!("{stem}.{ext}");
        if std::path::Path::new(&path).is_file() {
            let _ = std::fs::remove_file(&path);
        }
    }
}

/// Writes the output files. Path lengths are checked before anything is
/// created, and on a failed write the files already written are removed.
pub fn write(stem: &str, out: &Output) -> Result<Vec<String>, Error> {
    let files = files(stem, out);
    for (path, _) in &files {
        if path.len() > crate::MAX_PATH_LEN {
            return Err(Error::PathTooLong(path.clone()));
        }
    }
    let mut written: Vec<String> = vec![];
    for (path, content) in files {
        if let Err(err) = write_file(&path, &content) {
            if matches!(err, Error::FileWrite(..)) {
                let _ = std::fs::remove_file(&path);
            }
            for done in &written {
                let _ = std::fs::remove_file(done);
            }
            return Err(err);
        }
        written.push(path);
    }
    Ok(written)
}

pub fn write_file(path: &str, content: &str) -> Result<(), Error> {
    let mut file =
        std::fs::File::create(path).map_err(|e| Error::FileCreate(path.to_string(), e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| Error::FileWrite(path.to_string(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble;
    use crate::msg::Msgs;

    fn build(src: &str) -> Output {
        let mut msgs = Msgs::new("test.am");
        let prog = assemble(src, &mut msgs).unwrap();
        render(&prog).unwrap()
    }

    #[test]
    fn object_layout() {
        let out = build("MAIN: mov r1, r2\n stop\nN: .data -1\n");
        let lines: Vec<&str> = out.ob.lines().collect();
        assert_eq!(lines[0], "\td\tb");
        // opcode 0, both modes register, ARE 0
        assert_eq!(lines[1], "bcba aadda");
        assert_eq!(lines[2], "bcbb abaca");
        assert_eq!(lines[3], "bcbc ddaaa");
        assert_eq!(lines[4], "bcbd ddddd");
        assert_eq!(lines.len(), 5);
        assert_eq!(out.ent, None);
        assert_eq!(out.ext, None);
    }

    #[test]
    fn entries_and_externs() {
        let out = build(".entry MAIN\n.extern W\nMAIN: jsr W\n jmp W\n stop\n");
        assert_eq!(out.ent.as_deref(), Some("MAIN bcba\n"));
        assert_eq!(out.ext.as_deref(), Some("W bcbb\nW bcbd\n"));
    }

    #[test]
    fn extern_without_use() {
        let out = build(".extern W\n stop\n");
        assert_eq!(out.ext, None);
    }

    #[test]
    fn limit() {
        assert_eq!(object_limit(), 255);
    }

    fn scratch(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("quadasm-out-{}-{name}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn failed_write_leaves_nothing() {
        let dir = scratch("partial");
        let stem = dir.join("prog");
        let stem = stem.to_str().unwrap();
        std::fs::create_dir_all(format!("{stem}.ent")).unwrap();

        let out = build(".entry MAIN\nMAIN: stop\n");
        let err = write(stem, &out).unwrap_err();
        assert_eq!(err.code(), "AS062");
        assert!(!std::path::Path::new(&format!("{stem}.ob")).exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn clean_removes_stale_outputs() {
        let dir = scratch("stale");
        let stem = dir.join("prog");
        let stem = stem.to_str().unwrap();

        write(stem, &build(".entry MAIN\nMAIN: stop\n")).unwrap();
        assert!(std::path::Path::new(&format!("{stem}.ent")).exists());

        clean(stem);
        for ext in ["ob", "ent", "ext"] {
            assert!(!std::path::Path::new(&format!("{stem}.{ext}")).exists());
        }
        clean(stem);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn path_too_long() {
        let out = build(" stop\n");
        let stem = "x".repeat(600);
        assert!(matches!(write(&stem, &out), Err(Error::PathTooLong(_))));
    }
}
