/// Parser state and entrypoint.
///
/// This chunk defines the [`Parser`] type, the keyword vocabulary, and the
/// top-level `parse()` entrypoint.
// Keyword and punctuation literals. The vocabulary is small enough that the
// parser dispatches on literal text directly.
pub(crate) const KW_SEMI: &str = ";";

pub(crate) const KW_IMPORT: &str = "import";
pub(crate) const KW_VAR: &str = "var";
pub(crate) const KW_TYPE: &str = "type";
pub(crate) const KW_FN: &str = "fn";
pub(crate) const KW_RETURN: &str = "return";
pub(crate) const KW_SWITCH: &str = "switch";
pub(crate) const KW_CASE: &str = "case";
pub(crate) const KW_DEFAULT: &str = "default";
pub(crate) const KW_STRUCT: &str = "struct";
pub(crate) const KW_UNION: &str = "union";
pub(crate) const KW_INTERFACE: &str = "interface";
pub(crate) const KW_BEGIN: &str = "begin";
pub(crate) const KW_END: &str = "end";

/// Delimiters ending a raw value span at the end of the statement.
const STMT_END: &[char] = &['\n', '\r', ';'];

/// Parser state.
///
/// Owns the lookahead [`Cursor`] and the [`SourceFile`] under construction.
/// Each invocation owns its own token stream and output tree; there is no
/// shared state across parses.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    file: SourceFile,
}

impl<'a> Parser<'a> {
    pub fn new(name: &str, source: &'a str) -> Result<Self, ParseError> {
        let cursor = Cursor::new(Scanner::new(source))?;
        Ok(Self {
            cursor,
            file: SourceFile::new(name),
        })
    }

    /// Create a parser whose cursor echoes every consumed token to `sink`.
    pub fn with_trace(name: &str, source: &'a str, sink: TraceSink<'a>) -> Result<Self, ParseError> {
        let cursor = Cursor::with_trace(Scanner::new(source), sink)?;
        Ok(Self {
            cursor,
            file: SourceFile::new(name),
        })
    }

    /// Parse the unit: `decl*`, where a declaration starts with one of
    /// `var | import | fn | type`.
    ///
    /// Any other leading literal ends declaration parsing without consuming
    /// the remaining tokens; this lets the unit terminate naturally at
    /// end-of-input and tolerates trailing garbage.
    pub fn parse(mut self) -> Result<SourceFile, ParseError> {
        self.skip_newlines()?;

        while !self.cursor.is_eof() {
            let decl = if self.at(KW_VAR) {
                Decl::Var(self.var_decl()?)
            } else if self.at(KW_IMPORT) {
                Decl::Import(self.import_decl()?)
            } else if self.at(KW_FN) {
                Decl::Func(self.func_decl()?)
            } else if self.at(KW_TYPE) {
                Decl::Type(self.type_decl()?)
            } else {
                break;
            };
            self.file.decls.push(decl);
        }

        Ok(self.file)
    }
}
