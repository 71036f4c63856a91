use enum_ordinalize::Ordinalize;
use logos::Logos;

/// The syntax tag type.
///
/// This type is used both in lexing (as token) and in the syntax tree (as
/// subtree tag).
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Ordinalize)]
#[repr(u16)]
pub enum SynTag {
    // =========== Tokens ============
    // === Aux Tokens ===
    /// Whitespace, including line feeds. TTCN-3 is not line sensitive.
    #[regex(r"[ \t\r\n\f]+")]
    WS,
    #[regex(r"//[^\r\n]*")]
    LineComment,
    #[token("/*", block_comment)]
    BlockComment,

    // === Keywords ===
    #[token("module")]
    ModuleKw,
    #[token("import")]
    ImportKw,
    #[token("from")]
    FromKw,
    #[token("all")]
    AllKw,
    #[token("except")]
    ExceptKw,
    #[token("recursive")]
    RecursiveKw,
    #[token("group")]
    GroupKw,
    #[token("language")]
    LanguageKw,
    #[token("with")]
    WithKw,
    #[token("private")]
    PrivateKw,
    #[token("public")]
    PublicKw,
    #[token("friend")]
    FriendKw,

    #[token("type")]
    TypeKw,
    #[token("record")]
    RecordKw,
    #[token("set")]
    SetKw,
    #[token("union")]
    UnionKw,
    #[token("enumerated")]
    EnumeratedKw,
    #[token("of")]
    OfKw,
    #[token("component")]
    ComponentKw,
    #[token("extends")]
    ExtendsKw,
    #[token("port")]
    PortKw,
    #[token("message")]
    MessageKw,
    #[token("procedure")]
    ProcedureKw,
    #[token("mixed")]
    MixedKw,
    #[token("map")]
    MapKw,
    #[token("unmap")]
    UnmapKw,
    #[token("param")]
    ParamKw,
    #[token("optional")]
    OptionalKw,

    #[token("signature")]
    SignatureKw,
    #[token("exception")]
    ExceptionKw,
    #[token("noblock")]
    NoblockKw,
    #[token("function")]
    FunctionKw,
    #[token("testcase")]
    TestcaseKw,
    #[token("altstep")]
    AltstepKw,
    #[token("external")]
    ExternalKw,
    #[token("runs")]
    RunsKw,
    #[token("on")]
    OnKw,
    #[token("mtc")]
    MtcKw,
    #[token("system")]
    SystemKw,
    #[token("return")]
    ReturnKw,
    #[token("template")]
    TemplateKw,
    #[token("modifies")]
    ModifiesKw,
    #[token("const")]
    ConstKw,
    #[token("var")]
    VarKw,
    #[token("timer")]
    TimerKw,
    #[token("modulepar")]
    ModuleparKw,
    #[token("control")]
    ControlKw,
    #[token("in")]
    InKw,
    #[token("out")]
    OutKw,
    #[token("inout")]
    InoutKw,

    #[token("if")]
    IfKw,
    #[token("else")]
    ElseKw,
    #[token("for")]
    ForKw,
    #[token("while")]
    WhileKw,
    #[token("do")]
    DoKw,
    #[token("label")]
    LabelKw,
    #[token("goto")]
    GotoKw,
    #[token("break")]
    BreakKw,
    #[token("continue")]
    ContinueKw,
    #[token("alt")]
    AltKw,
    #[token("interleave")]
    InterleaveKw,
    #[token("select")]
    SelectKw,
    #[token("case")]
    CaseKw,

    #[token("self")]
    SelfKw,
    #[token("omit")]
    OmitKw,
    #[token("true")]
    TrueKw,
    #[token("false")]
    FalseKw,
    #[token("none")]
    NoneKw,
    #[token("pass")]
    PassKw,
    #[token("inconc")]
    InconcKw,
    #[token("fail")]
    FailKw,
    #[token("error")]
    ErrorKw,

    // `and`, `or`, `xor`, `not`, `mod` and `rem` are both keywords and operators
    #[token("and")]
    AndKw,
    #[token("or")]
    OrKw,
    #[token("xor")]
    XorKw,
    #[token("not")]
    NotKw,
    #[token("and4b")]
    And4bKw,
    #[token("or4b")]
    Or4bKw,
    #[token("xor4b")]
    Xor4bKw,
    #[token("not4b")]
    Not4bKw,
    #[token("mod")]
    ModKw,
    #[token("rem")]
    RemKw,

    // === Identifiers ====
    #[regex(r"[a-zA-Z][0-9a-zA-Z_]*")]
    Ident,

    // === Literal Tokens ===
    #[regex(r"[0-9]+")]
    Int,
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+")]
    Float,
    /// A charstring literal. Quotes inside are escaped by doubling them.
    #[regex(r#""([^"]|"")*""#)]
    StringLiteral,
    /// A bitstring, hexstring or octetstring literal, e.g. `'1010'B`.
    #[regex(r"'[^'\r\n]*'[bBhHoO]")]
    BitstringLiteral,

    // === Operators ===
    #[token(":=")]
    Assign,
    #[token("+")]
    Add,
    #[token("-")]
    Sub,
    #[token("*")]
    Mul,
    #[token("/")]
    Div,
    #[token("&")]
    Amp,
    #[token(">")]
    Gt,
    #[token(">=")]
    Ge,
    #[token("<")]
    Lt,
    #[token("<=")]
    Le,
    #[token("==")]
    Eq,
    #[token("!=")]
    Neq,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("<@")]
    Rotl,
    #[token("@>")]
    Rotr,
    #[token("->")]
    Arrow,
    #[token("..")]
    DotDot,
    #[token("?")]
    Question,
    #[token("@")]
    At,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,

    /// Anything that doesn't match. Also the last token entry.
    #[error]
    Error,

    // ================ Syntax Nodes ================
    /// The name introduced by a declaration
    Name,
    Visibility,

    // Module level
    Module,
    LanguageSpec,
    ModuleDef,
    ImportDecl,
    ImportSpec,
    GroupDecl,
    ControlPart,
    WithSpec,

    // Types
    SubTypeDecl,
    StructTypeDecl,
    EnumTypeDecl,
    ComponentTypeDecl,
    ExtendsSpec,
    PortTypeDecl,
    PortAttribute,
    PortMapAttribute,
    BehaviourTypeDecl,
    Field,
    ArrayDef,
    ValueConstraint,
    RefSpec,
    TypeArgs,
    StructSpec,
    ListSpec,
    EnumSpec,
    BehaviourSpec,

    // Behaviour
    FuncDecl,
    SignatureDecl,
    ExceptionSpec,
    TemplateDecl,
    TemplateRestriction,
    ModifiesSpec,
    RunsOnSpec,
    MtcSpec,
    SystemSpec,
    ReturnSpec,
    TypePars,
    FormalPars,
    FormalPar,
    ValueDecl,
    Declarator,

    // Statements
    BlockStmt,
    DeclStmt,
    ExprStmt,
    IfStmt,
    ForStmt,
    WhileStmt,
    DoWhileStmt,
    AltStmt,
    AltGuard,
    Redirect,
    SelectStmt,
    CaseClause,
    BranchStmt,
    ReturnStmt,

    // Expressions
    /// An identifier used as an expression
    IdentExpr,
    ValueLiteral,
    CompositeLiteral,
    ParenExpr,
    UnaryExpr,
    BinaryExpr,
    CallExpr,
    ArgList,
    SelectorExpr,
    IndexExpr,

    /// Tokens the parser could not make sense of
    ErrorNode,

    /// The root node of the syntax tree
    Root,
}

/// Skips to the end of a `/* ... */` comment. An unterminated comment is an
/// error token spanning the rest of the input.
fn block_comment(lex: &mut logos::Lexer<SynTag>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => {
            lex.bump(lex.remainder().len());
            false
        }
    }
}

impl SynTag {
    pub fn is_token(&self) -> bool {
        *self <= SynTag::Error
    }

    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            SynTag::WS | SynTag::LineComment | SynTag::BlockComment
        )
    }

    pub fn is_keyword(&self) -> bool {
        *self >= SynTag::ModuleKw && *self <= SynTag::RemKw
    }
}

impl From<SynTag> for rowan::SyntaxKind {
    fn from(kind: SynTag) -> Self {
        rowan::SyntaxKind(kind.ordinal())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Ttcn3Lang {}

impl rowan::Language for Ttcn3Lang {
    type Kind = SynTag;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        SynTag::from_ordinal(raw.0).expect("Invalid syntax tag type!")
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind.ordinal())
    }
}
