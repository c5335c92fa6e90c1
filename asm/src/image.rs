use arch::word::{self, Are};
use arch::{ADDR_LIMIT, IC_BASE};

/// Address that may still depend on the final size of the code segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Addr {
    Fixed(u16),
    /// Declared at data offset `dc` while the code segment ended at `ic`.
    Provisional { ic: u16, dc: u16 },
}

impl Addr {
    pub fn value(&self) -> u16 {
        match *self {
            Addr::Fixed(v) => v,
            Addr::Provisional { ic, dc } => ic.saturating_add(dc),
        }
    }

    /// Moves a provisional address behind the final code segment. Fixed
    /// addresses are returned unchanged.
    pub fn relocate(self, final_ic: u16) -> Addr {
        match self {
            Addr::Fixed(_) => self,
            Addr::Provisional { dc, .. } => Addr::Fixed(final_ic.saturating_add(dc)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeWord {
    pub addr: u16,
    pub payload: u8,
    pub are: Are,
    /// Symbol still to be resolved by the second pass.
    pub label: Option<String>,
    pub line: usize,
}

impl CodeWord {
    pub fn bits(&self) -> u16 {
        word::pack(self.payload, self.are)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataWord {
    pub addr: Addr,
    pub value: i16,
    pub line: usize,
}

impl DataWord {
    pub fn bits(&self) -> u16 {
        word::data(self.value)
    }
}

#[derive(Debug, Clone)]
pub struct Image {
    pub code: Vec<CodeWord>,
    pub data: Vec<DataWord>,
    pub ic: u16,
    pub dc: u16,
}

impl Default for Image {
    fn default() -> Self {
        Image::new()
    }
}

impl Image {
    pub fn new() -> Self {
        Image {
            code: vec![],
            data: vec![],
            ic: IC_BASE,
            dc: 0,
        }
    }

    pub fn push_code(&mut self, payload: u8, are: Are, label: Option<String>, line: usize) -> u16 {
        let addr = self.ic;
        self.code.push(CodeWord {
            addr,
            payload,
            are,
            label,
            line,
        });
        self.ic = self.ic.saturating_add(1);
        addr
    }

    pub fn push_data(&mut self, value: i16, line: usize) -> Addr {
        let addr = self.data_addr();
        self.data.push(DataWord { addr, value, line });
        self.dc = self.dc.saturating_add(1);
        addr
    }

    /// Address the next data word would get.
    pub fn data_addr(&self) -> Addr {
        Addr::Provisional {
            ic: self.ic,
            dc: self.dc,
        }
    }

    /// `IC + DC` is still strictly below the address limit.
    pub fn fits(&self) -> bool {
        (self.ic as u32) + (self.dc as u32) < ADDR_LIMIT as u32
    }

    pub fn code_len(&self) -> usize {
        self.code.len()
    }

    pub fn data_len(&self) -> usize {
        self.data.len()
    }

    pub fn relocate_data(&mut self) {
        let final_ic = self.ic;
        for word in &mut self.data {
            word.addr = word.addr.relocate(final_ic);
        }
    }
}
