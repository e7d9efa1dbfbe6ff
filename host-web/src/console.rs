//! # Console 模块
//!
//! 把 `tracing` 输出转发到浏览器控制台。
//!
//! 使用 `tracing-subscriber` 的 fmt 格式化，每条事件写入一个 [`ConsoleWriter`]，
//! 写入器释放时按级别调用 `console.error` / `console.warn` / `console.log`。

use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::JsValue;
use web_sys::console;

/// 安装控制台日志订阅者，重复调用时保留第一次安装的订阅者
pub fn init(max_level: Level) {
    let installed = tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_writer(ConsoleMakeWriter)
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .try_init();
    if installed.is_err() {
        console::warn_1(&"日志订阅者已存在".into());
    }
}

/// 按事件级别创建写入器
pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

/// 缓冲一条格式化后的日志，释放时输出
pub struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl ConsoleWriter {
    fn new(level: Level) -> Self {
        Self {
            level,
            buffer: Vec::new(),
        }
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = console_line(&self.buffer);
        if line.is_empty() {
            return;
        }
        let message = JsValue::from(line);
        if self.level == Level::ERROR {
            console::error_1(&message);
        } else if self.level == Level::WARN {
            console::warn_1(&message);
        } else {
            console::log_1(&message);
        }
    }
}

/// 去掉 fmt 追加的换行
pub fn console_line(buffer: &[u8]) -> String {
    String::from_utf8_lossy(buffer).trim_end().to_string()
}
