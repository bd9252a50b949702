use log::{info, warn};

use crate::renderer::FontBook;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Language {
    Chinese,
    English,
}

/// Text shown by the agriculture structure chart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StructureLabels {
    pub title: &'static str,
    pub x_axis: &'static str,
    pub y_axis: &'static str,
    pub z_axis: &'static str,
    pub colorbar: &'static str,
    pub china_note: &'static str,
    pub western_note: &'static str,
}

/// Text shown by the competition chart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompetitionLabels {
    pub x_axis: &'static str,
    pub y_axis: &'static str,
    pub z_axis: &'static str,
    pub china_zone: &'static str,
    pub western_zone: &'static str,
    pub contest_belt: &'static str,
    pub saved: &'static str,
}

const STRUCTURE_ZH: StructureLabels = StructureLabels {
    title: "农业智能结构性短板分析\n(硬件优势无法弥补农艺缺失)",
    x_axis: "X: 硬件工程化能力",
    y_axis: "Y: 农艺生物学积淀",
    z_axis: "Z: 数据互信与合规",
    colorbar: "合规信任度",
    china_note: "中国位置\n(技术优势\n农艺不足)",
    western_note: "西方巨头\n(生物数据壁垒)",
};

const STRUCTURE_EN: StructureLabels = StructureLabels {
    title: "Agricultural Intelligence Structural Shortcomings\n(Hardware Cannot Compensate for Agronomy Deficit)",
    x_axis: "X: Hardware Engineering Capability",
    y_axis: "Y: Agronomic Biological Accumulation",
    z_axis: "Z: Data Mutual Trust & Compliance",
    colorbar: "Compliance/Trust Level",
    china_note: "China Position\n(Tech Advantage\nAg Deficit)",
    western_note: "Western Giants\n(Bio-Data Wall)",
};

const COMPETITION_ZH: CompetitionLabels = CompetitionLabels {
    x_axis: "X: 硬件工程化能力",
    y_axis: "Y: 农艺生物学积淀",
    z_axis: "Z: 数据互信与合规",
    china_zone: "中国优势区\n(极致性价比)",
    western_zone: "欧美壁垒区\n(农艺/合规)",
    contest_belt: "激烈竞争带",
    saved: "图片已生成：",
};

const COMPETITION_EN: CompetitionLabels = CompetitionLabels {
    x_axis: "X: Hardware Engineering Capability",
    y_axis: "Y: Agronomic Biological Accumulation",
    z_axis: "Z: Data Mutual Trust & Compliance",
    china_zone: "China Advantage Zone\n(Extreme Cost-Performance)",
    western_zone: "Western Barrier Zone\n(Agronomy/Compliance)",
    contest_belt: "Intense Competition Belt",
    saved: "Image generated: ",
};

impl Language {
    /// Chinese when the loaded fonts can draw every Chinese label, English otherwise.
    pub fn detect(fonts: &FontBook) -> Self {
        let chinese_labels = [
            STRUCTURE_ZH.title,
            STRUCTURE_ZH.x_axis,
            STRUCTURE_ZH.y_axis,
            STRUCTURE_ZH.z_axis,
            STRUCTURE_ZH.colorbar,
            STRUCTURE_ZH.china_note,
            STRUCTURE_ZH.western_note,
            COMPETITION_ZH.china_zone,
            COMPETITION_ZH.western_zone,
            COMPETITION_ZH.contest_belt,
        ];
        if chinese_labels.iter().all(|text| fonts.covers(text)) {
            info!("CJK glyphs available, using Chinese labels");
            Language::Chinese
        } else {
            warn!("no font with CJK glyphs found, falling back to English labels");
            Language::English
        }
    }

    pub fn structure(self) -> &'static StructureLabels {
        match self {
            Language::Chinese => &STRUCTURE_ZH,
            Language::English => &STRUCTURE_EN,
        }
    }

    pub fn competition(self) -> &'static CompetitionLabels {
        match self {
            Language::Chinese => &COMPETITION_ZH,
            Language::English => &COMPETITION_EN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_fonts_fall_back_to_english() {
        // egui's bundled faces carry no CJK glyphs
        assert_eq!(Language::detect(&FontBook::bundled()), Language::English);
    }

    #[test]
    fn english_tables_are_latin_only() {
        let fonts = FontBook::bundled();
        let s = Language::English.structure();
        let c = Language::English.competition();
        for text in [s.title, s.colorbar, s.china_note, s.western_note, c.china_zone, c.contest_belt] {
            assert!(fonts.covers(text), "{text}");
        }
    }

    #[test]
    fn axis_labels_are_shared_between_charts() {
        for lang in [Language::Chinese, Language::English] {
            assert_eq!(lang.structure().x_axis, lang.competition().x_axis);
            assert_eq!(lang.structure().z_axis, lang.competition().z_axis);
        }
    }
}
