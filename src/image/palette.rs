//! 调色板颜色与 RGB555 量化

use std::fmt;

/// RGB 颜色结构 (每通道 8 位)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// 创建黑色
    pub const fn black() -> Self {
        Self { r: 0, g: 0, b: 0 }
    }

    /// 创建白色
    pub const fn white() -> Self {
        Self { r: 255, g: 255, b: 255 }
    }

    /// 是否为纯黑
    pub fn is_black(self) -> bool {
        self == Self::black()
    }

    /// 从 `[r, g, b]` 创建颜色
    pub fn from_rgb(rgb: [u8; 3]) -> Self {
        let [r, g, b] = rgb;
        Self { r, g, b }
    }

    /// 量化为 RGB555 (`r << 10 | g << 5 | b`)
    pub fn to_rgb555(self) -> Rgb555 {
        let r = quantize5(self.r) as u16;
        let g = quantize5(self.g) as u16;
        let b = quantize5(self.b) as u16;
        Rgb555((r & 0x1f) << 10 | (g & 0x1f) << 5 | (b & 0x1f))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color(#{:02X}{:02X}{:02X})", self.r, self.g, self.b)
    }
}

/// 8 位通道量化为 5 位，先加 7 向上取整并在 255 处饱和
pub fn quantize5(channel: u8) -> u8 {
    channel.saturating_add(7) >> 3
}

/// 15 位颜色值
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgb555(pub u16);

impl Rgb555 {
    /// 红色分量 (5 位)
    pub fn r(self) -> u8 {
        ((self.0 >> 10) & 0x1f) as u8
    }

    /// 绿色分量 (5 位)
    pub fn g(self) -> u8 {
        ((self.0 >> 5) & 0x1f) as u8
    }

    /// 蓝色分量 (5 位)
    pub fn b(self) -> u8 {
        (self.0 & 0x1f) as u8
    }
}

impl fmt::LowerHex for Rgb555 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::UpperHex for Rgb555 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}
