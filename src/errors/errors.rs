use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// Syntax error raised while lexing or parsing.
#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::UnterminatedComment => "UnterminatedComment",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::UnterminatedComment => {
                ErrorTip::Suggestion(String::from("Block comment is missing its closing `*/`"))
            }
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.get_tip() {
            ErrorTip::None => write!(f, "{}", self.internal_error),
            tip => write!(f, "{} ({})", self.internal_error, tip),
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("unterminated block comment")]
    UnterminatedComment,
}

/// Semantic errors and notes reported while building the sema tree and
/// loading modules.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SemaError {
    #[error("type redefinition")]
    TypeRedefinition,
    #[error("previously defined here")]
    PreviouslyDefinedHere,
    #[error("enumerator redefinition")]
    EnumeratorRedefinition,
    #[error("function redefinition")]
    FunctionRedefinition,
    #[error("previous definition is here")]
    PreviousDefinitionIsHere,
    #[error("exporting local variables is not allowed")]
    ExportingLocalVariable,
    #[error("Variable can not be of void type")]
    VoidVariable,
    #[error("Declaration of a variable with 'auto' type requires an initializer")]
    AutoWithoutInitializer,
    #[error("Declaration of a reference variable requires an initializer")]
    ReferenceWithoutInitializer,
    #[error("inconsistent deduction for auto return type")]
    InconsistentAutoDeduction,
    #[error("deduced as '{ty}'")]
    DeducedAs { ty: String },
    #[error("recursively calling function with 'auto' return type is forbidden")]
    RecursiveAutoCall,
    #[error("using function with 'auto' return type before its definition is forbidden")]
    AutoUsedBeforeDefinition,
    #[error("break can be used only inside a loop")]
    BreakOutsideLoop,
    #[error("expected bool value, got {got}")]
    ExpectedBool { got: String },
    #[error("incompatible operand types. {lhs} and {rhs}")]
    IncompatibleOperands { lhs: String, rhs: String },
    #[error("initializer list must contain values")]
    EmptyInitializerList,
    #[error("all values of initializer list must have the same type")]
    InitializerListTypeMismatch,
    #[error("{ty} doesn't support operator {op}")]
    OperatorNotSupported { ty: String, op: String },
    #[error("{ty} does not have member {member}")]
    MemberNotFound { ty: String, member: String },
    #[error("{ty} does not have member function {function}")]
    MemberFunctionNotFound { ty: String, function: String },
    #[error("'{name}' identifier not found")]
    IdentifierNotFound { name: String },
    #[error("'{name}' function not found")]
    FunctionNotFound { name: String },
    #[error("no matching function for call to '{name}'")]
    NoMatchingFunction { name: String },
    #[error("ambiguous call to '{name}'")]
    AmbiguousCall { name: String },
    #[error("candidate function")]
    CandidateFunction,
    #[error("Importing failed")]
    ImportFailed,
    #[error("conflicting import of '{name}'")]
    ImportConflict { name: String },
    #[error("circular import of '{path}'")]
    CircularImport { path: String },
    #[error("could not read '{path}'")]
    SourceNotFound { path: String },
    #[error("{function} expects a string literal as the directory name")]
    ExpectedDirectoryName { function: String },
    #[error("failed to add subdirectory '{name}'")]
    AddSubdirectoryFailed { name: String },
    #[error("cannot initialize '{expected}' with a value of type '{got}'")]
    IncompatibleInitialization { expected: String, got: String },
    #[error("return type mismatch. Expected '{expected}', got '{got}'")]
    ReturnTypeMismatch { expected: String, got: String },
    #[error("declaration is not allowed here")]
    DeclarationNotAllowed,
    #[error("statement is not allowed here")]
    StatementNotAllowed,
    #[error("designated initializers require an explicit type")]
    DesignatedInitializerWithoutType,
    #[error("member '{member}' is initialized more than once")]
    MemberInitializedTwice { member: String },
    #[error("main function not found")]
    MainNotFound,
    #[error("{name}<> expects 1 generic parameter, got {got}")]
    GenericParameterCount { name: String, got: usize },
    #[error("value type not found")]
    ValueTypeNotFound,
    #[error("wrong generic type of an extern<>. Got '{got}', expected 'bool', 'int', 'double' or 'string'")]
    WrongExternType { got: String },
    #[error("'{name}' is not a generic type.")]
    NotGeneric { name: String },
    #[error("{name} type not found.")]
    TypeNotFound { name: String },
    #[error("unknown component type '{name}'")]
    UnknownComponent { name: String },
    #[error("component '{component}' has no property '{property}'")]
    UnknownProperty { component: String, property: String },
    #[error("property '{property}' expects '{expected}', got '{got}'")]
    PropertyTypeMismatch {
        property: String,
        expected: String,
        got: String,
    },
    #[error("component '{component}' requires property '{property}'")]
    MissingProperty { component: String, property: String },
    #[error("all values of a list property must have the same type")]
    PropertyListTypeMismatch,
    #[error("'{name}' can not be used as a base class")]
    InvalidBaseType { name: String },
    #[error("member can not be of incomplete type '{ty}'")]
    IncompleteMemberType { ty: String },
    #[error("failed to add declarative file '{name}'")]
    AddDeclarativeFileFailed { name: String },
}
