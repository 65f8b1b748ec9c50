use std::collections::HashMap;

/// First RAM address handed out to variables
pub const VARIABLE_BASE: u16 = 16;

const PREDEFINED: [(&str, u16); 7] = [
    ("SP", 0),
    ("LCL", 1),
    ("ARG", 2),
    ("THIS", 3),
    ("THAT", 4),
    ("SCREEN", 16384),
    ("KBD", 24576),
];

/// Symbol table seeded with the machine's predefined symbols.
///
/// Labels map to ROM addresses; any other symbol is a variable and is given
/// the next free RAM cell starting at [`VARIABLE_BASE`], in order of first
/// use.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    symbols: HashMap<String, u16>,
    next_variable: u16,
}

impl SymbolTable {
    pub fn new() -> Self {
        let mut symbols: HashMap<String, u16> = PREDEFINED
            .iter()
            .map(|(name, addr)| (name.to_string(), *addr))
            .collect();

        for register in 0..16u16 {
            symbols.insert(format!("R{}", register), register);
        }

        Self {
            symbols,
            next_variable: VARIABLE_BASE,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<u16> {
        self.symbols.get(name).copied()
    }

    pub fn insert(&mut self, name: &str, address: u16) {
        self.symbols.insert(name.to_string(), address);
    }

    /// Look a symbol up, allocating a variable cell if it is new
    pub fn resolve_or_allocate(&mut self, name: &str) -> u16 {
        if let Some(address) = self.get(name) {
            return address;
        }

        let address = self.next_variable;
        self.next_variable += 1;
        self.symbols.insert(name.to_string(), address);
        address
    }

    pub fn into_map(self) -> HashMap<String, u16> {
        self.symbols
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predefined_symbols() {
        let table = SymbolTable::new();
        assert_eq!(table.get("SP"), Some(0));
        assert_eq!(table.get("THAT"), Some(4));
        assert_eq!(table.get("R15"), Some(15));
        assert_eq!(table.get("KBD"), Some(24576));
    }

    #[test]
    fn test_variables_allocated_in_order() {
        let mut table = SymbolTable::new();
        assert_eq!(table.resolve_or_allocate("Foo.0"), 16);
        assert_eq!(table.resolve_or_allocate("Bar.0"), 17);
        assert_eq!(table.resolve_or_allocate("Foo.0"), 16);
        assert_eq!(table.resolve_or_allocate("ARG"), 2);
    }
}
