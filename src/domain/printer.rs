use std::fmt;

/// Paper and ink counters of the receipt printer. One receipt costs one unit of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Printer {
    paper: u32,
    ink: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrinterWarning {
    LowPaper,
    LowInk,
}

impl fmt::Display for PrinterWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrinterWarning::LowPaper => f.write_str("Low paper."),
            PrinterWarning::LowInk => f.write_str("Low ink."),
        }
    }
}

impl Printer {
    pub fn new(paper: u32, ink: u32) -> Self {
        Self { paper, ink }
    }

    pub fn paper_level(&self) -> u32 {
        self.paper
    }

    pub fn ink_level(&self) -> u32 {
        self.ink
    }

    pub fn has_paper(&self) -> bool {
        self.paper > 0
    }

    pub fn has_ink(&self) -> bool {
        self.ink > 0
    }

    /// True when a receipt can be printed.
    pub fn is_ready(&self) -> bool {
        self.has_paper() && self.has_ink()
    }

    pub fn use_paper(&mut self) {
        self.paper = self.paper.saturating_sub(1);
    }

    pub fn use_ink(&mut self) {
        self.ink = self.ink.saturating_sub(1);
    }

    pub fn set_paper_level(&mut self, sheets: u32) {
        self.paper = sheets;
    }

    pub fn set_ink_level(&mut self, units: u32) {
        self.ink = units;
    }

    pub fn refill_paper(&mut self, sheets: u32) {
        self.paper = self.paper.saturating_add(sheets);
    }

    pub fn refill_ink(&mut self, units: u32) {
        self.ink = self.ink.saturating_add(units);
    }

    pub fn is_low(&self, threshold: u32) -> bool {
        self.paper <= threshold || self.ink <= threshold
    }

    /// Low-level warnings for consumables that are running out but not yet empty.
    pub fn warnings(&self, threshold: u32) -> Vec<PrinterWarning> {
        let mut warnings = Vec::new();
        if self.has_paper() && self.paper <= threshold {
            warnings.push(PrinterWarning::LowPaper);
        }
        if self.has_ink() && self.ink <= threshold {
            warnings.push(PrinterWarning::LowInk);
        }
        warnings
    }
}
