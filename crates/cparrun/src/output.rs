use std::io::{self, Write};

use cparrun_model::{CommandSpec, TaskRecord};

/// Write results as a pretty-printed JSON array followed by a newline.
pub fn write_results<W: Write>(mut w: W, results: &[TaskRecord]) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut w, results)?;
    writeln!(w)?;
    w.flush()
}

/// Write one command per line.
pub fn write_commands<W: Write>(mut w: W, commands: &[CommandSpec]) -> io::Result<()> {
    for command in commands {
        writeln!(w, "{command}")?;
    }
    w.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_are_a_json_array_in_order() {
        let mut first = TaskRecord::running("aaaaaa", CommandSpec::line("echo 1"));
        first.finish("1\n".into(), String::new(), 0).unwrap();
        let mut second = TaskRecord::running("bbbbbb", CommandSpec::argv(["sleep", "9"]));
        second.time_out().unwrap();

        let mut buf = Vec::new();
        write_results(&mut buf, &[first, second]).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with("]\n"));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["command"], "echo 1");
        assert_eq!(value[0]["stdout"], "1\n");
        assert_eq!(value[0]["status"], "OK_FINISHED");
        assert_eq!(value[1]["command"], serde_json::json!(["sleep", "9"]));
        assert!(value[1]["return_code"].is_null());
    }

    #[test]
    fn empty_results_are_an_empty_array() {
        let mut buf = Vec::new();
        write_results(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "[]\n");
    }

    #[test]
    fn commands_one_per_line() {
        let mut buf = Vec::new();
        write_commands(
            &mut buf,
            &[CommandSpec::line("dig NS a.com"), CommandSpec::argv(["ls", "-l"])],
        )
        .unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "dig NS a.com\nls -l\n");
    }
}
