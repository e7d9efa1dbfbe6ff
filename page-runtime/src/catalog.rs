//! # Catalog 模块
//!
//! 组件详情目录：模态框展示的静态内容表。
//!
//! ## 设计说明
//!
//! - 目录在启动时构建一次，之后只读
//! - 内容是结构化文档（标题、段落、列表），渲染时统一做 HTML 转义
//! - 渲染结果的 class 结构与页面样式表约定一致（`.modal-header` / `.modal-body-content`）

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::error::CatalogError;

/// 行内片段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Inline {
    Text(String),
    /// 加粗
    Strong(String),
}

impl Inline {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn strong(s: impl Into<String>) -> Self {
        Self::Strong(s.into())
    }
}

/// 文档块
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Block {
    /// 小节标题
    Heading(String),
    /// 段落
    Paragraph(Vec<Inline>),
    /// 无序列表，每项由若干行内片段组成
    List(Vec<Vec<Inline>>),
}

/// 组件详情文档
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Font Awesome 图标名，如 `fa-microchip`
    pub icon: String,
    /// 模态框顶部大标题
    pub heading: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(icon: impl Into<String>, heading: impl Into<String>) -> Self {
        Self {
            icon: icon.into(),
            heading: heading.into(),
            blocks: Vec::new(),
        }
    }

    pub fn heading(mut self, text: impl Into<String>) -> Self {
        self.blocks.push(Block::Heading(text.into()));
        self
    }

    pub fn paragraph(self, text: impl Into<String>) -> Self {
        self.rich_paragraph(vec![Inline::text(text)])
    }

    pub fn rich_paragraph(mut self, spans: Vec<Inline>) -> Self {
        self.blocks.push(Block::Paragraph(spans));
        self
    }

    pub fn list(mut self, items: impl IntoIterator<Item = Vec<Inline>>) -> Self {
        self.blocks.push(Block::List(items.into_iter().collect()));
        self
    }

    /// 渲染为 HTML 片段
    pub fn render_html(&self) -> String {
        let mut html = String::new();
        html.push_str("<div class=\"modal-header\">\n");
        let _ = writeln!(
            html,
            "    <h2><i class=\"fas {}\"></i> {}</h2>",
            escape_html(&self.icon),
            escape_html(&self.heading)
        );
        html.push_str("</div>\n");
        html.push_str("<div class=\"modal-body-content\">\n");
        for block in &self.blocks {
            match block {
                Block::Heading(text) => {
                    let _ = writeln!(html, "    <h3>{}</h3>", escape_html(text));
                }
                Block::Paragraph(spans) => {
                    let _ = writeln!(html, "    <p>{}</p>", render_spans(spans));
                }
                Block::List(items) => {
                    html.push_str("    <ul>\n");
                    for item in items {
                        let _ = writeln!(html, "        <li>{}</li>", render_spans(item));
                    }
                    html.push_str("    </ul>\n");
                }
            }
        }
        html.push_str("</div>");
        html
    }

    /// 纯文本内容（去掉全部标记），块之间以换行分隔
    pub fn plain_text(&self) -> String {
        let mut lines = vec![self.heading.clone()];
        for block in &self.blocks {
            match block {
                Block::Heading(text) => lines.push(text.clone()),
                Block::Paragraph(spans) => lines.push(spans_text(spans)),
                Block::List(items) => lines.extend(items.iter().map(|i| spans_text(i))),
            }
        }
        lines.join("\n")
    }
}

fn render_spans(spans: &[Inline]) -> String {
    spans
        .iter()
        .map(|span| match span {
            Inline::Text(t) => escape_html(t),
            Inline::Strong(t) => format!("<strong>{}</strong>", escape_html(t)),
        })
        .collect()
}

fn spans_text(spans: &[Inline]) -> String {
    spans
        .iter()
        .map(|span| match span {
            Inline::Text(t) | Inline::Strong(t) => t.as_str(),
        })
        .collect()
}

/// 转义 HTML 特殊字符
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// 组件详情条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentInfo {
    /// 组件标识，如 `servo`
    pub key: String,
    /// 显示标题
    pub title: String,
    pub content: Document,
}

/// 组件详情目录
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentCatalog {
    entries: Vec<ComponentInfo>,
}

impl ComponentCatalog {
    /// 从条目列表构建目录
    ///
    /// 标识不能为空，也不能重复。
    pub fn new(entries: Vec<ComponentInfo>) -> Result<Self, CatalogError> {
        for (i, entry) in entries.iter().enumerate() {
            if entry.key.trim().is_empty() {
                return Err(CatalogError::EmptyKey);
            }
            if entries[..i].iter().any(|e| e.key == entry.key) {
                return Err(CatalogError::DuplicateKey {
                    key: entry.key.clone(),
                });
            }
        }
        Ok(Self { entries })
    }

    /// 从 JSON 数组解析目录
    pub fn from_json(content: &str) -> Result<Self, CatalogError> {
        let entries: Vec<ComponentInfo> =
            serde_json::from_str(content).map_err(|e| CatalogError::Parse {
                message: e.to_string(),
            })?;
        Self::new(entries)
    }

    /// 按标识查找
    pub fn get(&self, key: &str) -> Option<&ComponentInfo> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// 按定义顺序返回所有标识
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    pub fn entries(&self) -> &[ComponentInfo] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 展示页内置的四个组件
    pub fn builtin() -> Self {
        Self {
            entries: vec![raspberry_pi(), camera(), servo(), ultrasonic()],
        }
    }
}

impl Default for ComponentCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn labeled(label: &str, text: &str) -> Vec<Inline> {
    vec![Inline::strong(label), Inline::text(format!(" {text}"))]
}

fn plain(text: &str) -> Vec<Inline> {
    vec![Inline::text(text)]
}

fn raspberry_pi() -> ComponentInfo {
    ComponentInfo {
        key: "raspberry-pi".to_string(),
        title: "Raspberry Pi 4B - The Brain".to_string(),
        content: Document::new("fa-microchip", "Raspberry Pi 4B")
            .heading("Scientific Explanation")
            .paragraph(
                "The Raspberry Pi 4B serves as the central processing unit of our surveillance \
                 robot. This single-board computer contains a System-on-Chip (SoC) architecture \
                 that integrates the CPU, GPU, RAM, and various interfaces on a single silicon die.",
            )
            .heading("Technical Specifications")
            .list([
                labeled(
                    "Processor:",
                    "Broadcom BCM2711, Quad-core Cortex-A72 (ARM v8) 64-bit SoC @ 1.5GHz",
                ),
                labeled("Memory:", "8GB LPDDR4-3200 SDRAM"),
                labeled(
                    "Connectivity:",
                    "2.4 GHz and 5.0 GHz IEEE 802.11ac wireless, Bluetooth 5.0, BLE",
                ),
                labeled(
                    "GPIO:",
                    "40-pin GPIO header for sensor and actuator connections",
                ),
                labeled("Video:", "2 × micro-HDMI ports supporting up to 4Kp60"),
                labeled("Camera Interface:", "MIPI CSI camera port"),
            ])
            .heading("Role in the Robot")
            .paragraph(
                "The Raspberry Pi processes video feeds from cameras, executes computer vision \
                 algorithms for motion detection, controls servo motors through PWM signals, and \
                 manages communication with ultrasonic sensors. It runs our custom Python-based \
                 control software that coordinates all robot functions.",
            )
            .heading("Power Consumption")
            .paragraph(
                "Operating at 5V with approximately 3W power consumption under typical load, \
                 making it ideal for battery-powered mobile applications.",
            ),
    }
}

fn camera() -> ComponentInfo {
    ComponentInfo {
        key: "camera".to_string(),
        title: "HD Camera Module - The Eyes".to_string(),
        content: Document::new("fa-camera", "HD Camera Module")
            .heading("Scientific Explanation")
            .paragraph(
                "The camera module utilizes a CMOS (Complementary Metal-Oxide-Semiconductor) image \
                 sensor that converts light photons into electrical signals. Each pixel contains \
                 photodiodes that generate electrical current proportional to light intensity.",
            )
            .heading("Technical Specifications")
            .list([
                labeled("Sensor:", "Sony IMX219 8-megapixel sensor"),
                labeled(
                    "Resolution:",
                    "3280 × 2464 pixels (still), 1920 × 1080 @ 30fps (video)",
                ),
                labeled(
                    "Lens:",
                    "Fixed focus lens with 62.2° diagonal field of view",
                ),
                labeled("Interface:", "MIPI CSI-2 interface to Raspberry Pi"),
                labeled(
                    "Night Vision:",
                    "IR-sensitive with external IR LED illumination",
                ),
                labeled("Focus Range:", "1m to infinity"),
            ])
            .heading("Computer Vision Processing")
            .paragraph("The camera feed is processed using OpenCV library for:")
            .list([
                plain("Motion detection using background subtraction algorithms"),
                plain("Object recognition using pre-trained neural networks"),
                plain("Face detection using Haar cascades"),
                plain("Real-time video streaming over network protocols"),
            ])
            .heading("Servo-Controlled Pan/Tilt Mechanism")
            .paragraph(
                "Mounted on a dual-axis servo system allowing 180° horizontal rotation and 90° \
                 vertical tilt, providing comprehensive area coverage and target tracking \
                 capabilities.",
            ),
    }
}

fn servo() -> ComponentInfo {
    ComponentInfo {
        key: "servo".to_string(),
        title: "Servo Motors - Precision Movement".to_string(),
        content: Document::new("fa-cog", "Servo Motors")
            .heading("Scientific Explanation")
            .paragraph(
                "Servo motors are closed-loop control systems that use feedback to achieve precise \
                 position control. They contain a DC motor, reduction gears, potentiometer for \
                 position feedback, and control circuitry integrated into a compact package.",
            )
            .heading("Technical Specifications (SG90 Micro Servo)")
            .list([
                labeled("Operating Voltage:", "4.8V - 6V"),
                labeled("Stall Torque:", "2.5 kg⋅cm (4.8V), 3.0 kg⋅cm (6V)"),
                labeled("Operating Speed:", "0.1 s/60° (4.8V), 0.08 s/60° (6V)"),
                labeled("Rotation Range:", "180° ± 10°"),
                labeled("Control Signal:", "PWM (Pulse Width Modulation)"),
                labeled("Deadband Width:", "1μs"),
            ])
            .heading("Control Mechanism")
            .paragraph(
                "Servos are controlled using PWM signals with a 50Hz frequency (20ms period). The \
                 pulse width determines position:",
            )
            .list([
                plain("1ms pulse width = 0° position"),
                plain("1.5ms pulse width = 90° position (center)"),
                plain("2ms pulse width = 180° position"),
            ])
            .heading("Applications in the Robot")
            .rich_paragraph(labeled(
                "Camera Pan/Tilt System:",
                "Two servos provide precise camera positioning for surveillance coverage.",
            ))
            .rich_paragraph(labeled(
                "Steering Mechanism:",
                "One servo controls front wheel steering for directional movement.",
            ))
            .heading("Control Algorithm")
            .paragraph(
                "The Raspberry Pi generates PWM signals through its GPIO pins, with software PID \
                 control loops ensuring smooth and accurate positioning based on sensor feedback \
                 and navigation algorithms.",
            ),
    }
}

fn ultrasonic() -> ComponentInfo {
    ComponentInfo {
        key: "ultrasonic".to_string(),
        title: "Ultrasonic Sensors - Echolocation".to_string(),
        content: Document::new("fa-wave-square", "Ultrasonic Sensors")
            .heading("Scientific Explanation")
            .paragraph(
                "Ultrasonic sensors operate on the principle of echolocation, similar to how bats \
                 navigate. They emit high-frequency sound waves (40kHz) and measure the time taken \
                 for the echo to return after reflecting off objects.",
            )
            .heading("Technical Specifications (HC-SR04)")
            .list([
                labeled("Operating Frequency:", "40kHz ultrasonic waves"),
                labeled("Detection Range:", "2cm to 400cm"),
                labeled("Accuracy:", "±3mm"),
                labeled("Measuring Angle:", "15° cone"),
                labeled("Operating Voltage:", "5V DC"),
                labeled("Operating Current:", "15mA"),
                labeled("Trigger Input Signal:", "10μs TTL pulse"),
            ])
            .heading("Physics of Operation")
            .paragraph("The distance calculation uses the formula:")
            .rich_paragraph(vec![Inline::strong(
                "Distance = (Time × Speed of Sound) / 2",
            )])
            .paragraph(
                "Where speed of sound ≈ 343 m/s at 20°C. The division by 2 accounts for the \
                 round-trip time of the sound wave.",
            )
            .heading("Sensor Array Configuration")
            .paragraph("Four HC-SR04 sensors are strategically mounted:")
            .list([
                labeled(
                    "Front Sensor:",
                    "Primary obstacle detection and distance measurement",
                ),
                labeled(
                    "Rear Sensor:",
                    "Backup assistance and rear obstacle detection",
                ),
                labeled(
                    "Left/Right Sensors:",
                    "Side obstacle detection for navigation",
                ),
            ])
            .heading("Signal Processing")
            .paragraph("The Raspberry Pi processes ultrasonic data using:")
            .list([
                plain("Kalman filtering for noise reduction"),
                plain("Sensor fusion algorithms combining multiple sensor readings"),
                plain("Obstacle mapping for navigation planning"),
                plain("Real-time collision avoidance algorithms"),
            ])
            .heading("Navigation Algorithm")
            .paragraph(
                "The sensor data feeds into a navigation algorithm that creates a local obstacle \
                 map, plans optimal paths, and executes avoidance maneuvers in real-time.",
            ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_keys() {
        let catalog = ComponentCatalog::builtin();
        let keys: Vec<&str> = catalog.keys().collect();
        assert_eq!(keys, vec!["raspberry-pi", "camera", "servo", "ultrasonic"]);
        assert!(!catalog.contains("lidar"));
    }

    #[test]
    fn test_servo_content() {
        let catalog = ComponentCatalog::builtin();
        let servo = catalog.get("servo").unwrap();
        assert_eq!(servo.title, "Servo Motors - Precision Movement");
        let html = servo.content.render_html();
        assert!(html.contains("SG90 Micro Servo"));
        assert!(html.starts_with("<div class=\"modal-header\">"));
        assert!(html.contains("<h2><i class=\"fas fa-cog\"></i> Servo Motors</h2>"));
        assert!(html.contains("<li><strong>Deadband Width:</strong> 1μs</li>"));
        assert!(html.ends_with("</div>"));
    }

    #[test]
    fn test_render_escapes_text() {
        let doc = Document::new("fa-x", "A & B")
            .paragraph("1 < 2")
            .list([plain("\"quoted\"")]);
        let html = doc.render_html();
        assert!(html.contains("A &amp; B"));
        assert!(html.contains("<p>1 &lt; 2</p>"));
        assert!(html.contains("<li>&quot;quoted&quot;</li>"));
    }

    #[test]
    fn test_plain_text() {
        let doc = Document::new("fa-x", "Title")
            .heading("Section")
            .rich_paragraph(labeled("Label:", "value"))
            .list([plain("one"), plain("two")]);
        insta::assert_snapshot!(doc.plain_text(), @r"
        Title
        Section
        Label: value
        one
        two
        ");
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let entry = raspberry_pi();
        let err = ComponentCatalog::new(vec![entry.clone(), entry]).unwrap_err();
        assert_eq!(
            err,
            CatalogError::DuplicateKey {
                key: "raspberry-pi".to_string()
            }
        );
    }

    #[test]
    fn test_empty_key_rejected() {
        let mut entry = camera();
        entry.key = "  ".to_string();
        assert_eq!(
            ComponentCatalog::new(vec![entry]).unwrap_err(),
            CatalogError::EmptyKey
        );
    }

    #[test]
    fn test_catalog_from_json() {
        let json = r#"[
            {
                "key": "lidar",
                "title": "LiDAR",
                "content": {
                    "icon": "fa-satellite-dish",
                    "heading": "LiDAR",
                    "blocks": [
                        { "heading": "Overview" },
                        { "paragraph": [{ "text": "Spins " }, { "strong": "fast" }] }
                    ]
                }
            }
        ]"#;
        let catalog = ComponentCatalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 1);
        let html = catalog.get("lidar").unwrap().content.render_html();
        assert!(html.contains("<p>Spins <strong>fast</strong></p>"));

        assert!(matches!(
            ComponentCatalog::from_json("{"),
            Err(CatalogError::Parse { .. })
        ));
    }
}
