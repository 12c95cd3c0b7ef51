//! Native semantics of the builtin functions.
//!
//! Operators that return a reference (`=`, `+=`, `++`, `at`...) return an
//! alias of `this` or of the element, so the result can be assigned to.
//! Faults such as division by zero are reported as fatal errors.

use std::cmp::Ordering;

use tracing::trace;

use crate::sema::{
    builtin_context::BuiltinTypes,
    builtin_function_kind::BuiltinFunctionKind as K,
    registry::Registry,
    types::{TypeId, TypeKind},
};

use super::{
    facade::{CmakeFacade, Visibility},
    instance::{create_default, Instance, InstanceValue, Version},
};

/// Largest string, in bytes, or list, in elements, a builtin may create.
const MAX_CONTAINER_SIZE: usize = 1 << 26;

#[derive(Debug, Clone, Copy)]
enum Arithmetic {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

#[derive(Debug, Clone, Copy)]
enum Comparison {
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,
}

impl Comparison {
    fn test(&self, ordering: Option<Ordering>) -> bool {
        match (self, ordering) {
            (Comparison::NotEqual, ordering) => ordering != Some(Ordering::Equal),
            (_, None) => false,
            (Comparison::Less, Some(o)) => o == Ordering::Less,
            (Comparison::LessEqual, Some(o)) => o != Ordering::Greater,
            (Comparison::Greater, Some(o)) => o == Ordering::Greater,
            (Comparison::GreaterEqual, Some(o)) => o != Ordering::Less,
            (Comparison::Equal, Some(o)) => o == Ordering::Equal,
        }
    }
}

/// `None` on division by zero.
fn int_arithmetic(op: Arithmetic, lhs: i64, rhs: i64) -> Option<i64> {
    match op {
        Arithmetic::Add => Some(lhs.wrapping_add(rhs)),
        Arithmetic::Sub => Some(lhs.wrapping_sub(rhs)),
        Arithmetic::Mul => Some(lhs.wrapping_mul(rhs)),
        Arithmetic::Div if rhs == 0 => None,
        Arithmetic::Div => Some(lhs.wrapping_div(rhs)),
        Arithmetic::Rem if rhs == 0 => None,
        Arithmetic::Rem => Some(lhs.wrapping_rem(rhs)),
    }
}

fn double_arithmetic(op: Arithmetic, lhs: f64, rhs: f64) -> f64 {
    match op {
        Arithmetic::Add => lhs + rhs,
        Arithmetic::Sub => lhs - rhs,
        Arithmetic::Mul => lhs * rhs,
        Arithmetic::Div => lhs / rhs,
        Arithmetic::Rem => lhs % rhs,
    }
}

/// Ordering of two values of the same builtin type.
fn compare_values(lhs: &InstanceValue, rhs: &InstanceValue) -> Option<Ordering> {
    match (lhs, rhs) {
        (InstanceValue::Bool(l), InstanceValue::Bool(r)) => l.partial_cmp(r),
        (InstanceValue::Int(l), InstanceValue::Int(r)) => l.partial_cmp(r),
        (InstanceValue::Double(l), InstanceValue::Double(r)) => l.partial_cmp(r),
        (InstanceValue::String(l), InstanceValue::String(r)) => l.partial_cmp(r),
        (InstanceValue::Version(l), InstanceValue::Version(r)) => l.partial_cmp(r),
        (InstanceValue::EnumConstant(l), InstanceValue::EnumConstant(r)) => l.partial_cmp(r),
        (l, r) if l == r => Some(Ordering::Equal),
        _ => None,
    }
}

/// Position of the first char at or after `from` whose membership in `set`
/// equals `member`.
fn find_char(s: &str, set: &str, from: usize, member: bool) -> Option<usize> {
    s.get(from..)?
        .char_indices()
        .find(|(_, c)| set.contains(*c) == member)
        .map(|(i, _)| i + from)
}

fn index_or_minus_one(index: Option<usize>) -> i64 {
    index.map(|i| i as i64).unwrap_or(-1)
}

fn parse_extern_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}

pub struct BuiltinFunctionCaller<'e> {
    facade: &'e mut dyn CmakeFacade,
    registry: &'e Registry,
    builtins: BuiltinTypes,
}

impl<'e> BuiltinFunctionCaller<'e> {
    pub fn new(
        facade: &'e mut dyn CmakeFacade,
        registry: &'e Registry,
        builtins: BuiltinTypes,
    ) -> Self {
        BuiltinFunctionCaller {
            facade,
            registry,
            builtins,
        }
    }

    fn fatal(&mut self, message: &str) -> Option<Instance> {
        self.facade.fatal_error(message);
        None
    }

    fn void(&self) -> Option<Instance> {
        Some(Instance::void(self.builtins.void))
    }

    fn bool(&self, value: bool) -> Option<Instance> {
        Some(Instance::new(self.builtins.bool, InstanceValue::Bool(value)))
    }

    fn int(&self, value: i64) -> Option<Instance> {
        Some(Instance::new(self.builtins.int, InstanceValue::Int(value)))
    }

    fn double(&self, value: f64) -> Option<Instance> {
        Some(Instance::new(self.builtins.double, InstanceValue::Double(value)))
    }

    fn string(&self, value: String) -> Option<Instance> {
        Some(Instance::new(self.builtins.string, InstanceValue::String(value)))
    }

    fn version(&self, value: Version) -> Option<Instance> {
        Some(Instance::new(self.builtins.version, InstanceValue::Version(value)))
    }

    /// Copies `value` into `this` and returns `this` as a reference.
    ///
    /// A class value only overwrites the members it has, so assigning a base
    /// through a base reference keeps the derived members of the target.
    fn assign(&self, this: &Instance, value: &Instance) -> Option<Instance> {
        let copy = value.object().value.deep_copy();
        let target_is_complex = matches!(this.object().value, InstanceValue::Complex(_));

        match copy {
            InstanceValue::Complex(members) if target_is_complex => {
                for (index, member) in members {
                    this.set_member(index, member);
                }
            }
            copy => this.set_value(copy),
        }
        Some(this.alias())
    }

    pub fn call(
        &mut self,
        kind: K,
        this: Option<Instance>,
        args: Vec<Instance>,
        return_type: TypeId,
    ) -> Option<Instance> {
        trace!(?kind, "builtin call");
        let this = this.unwrap_or_else(|| Instance::void(self.builtins.void));

        match kind {
            K::BoolCtor => self.bool(false),
            K::BoolCtorBool => self.bool(args[0].as_bool()),
            K::BoolCtorInt => self.bool(args[0].as_int() != 0),
            K::BoolOperatorEqual => self.assign(&this, &args[0]),
            K::BoolOperatorEqualEqual => self.bool(this.as_bool() == args[0].as_bool()),
            K::BoolOperatorNotEqual => self.bool(this.as_bool() != args[0].as_bool()),
            K::BoolOperatorAndAnd => self.bool(this.as_bool() && args[0].as_bool()),
            K::BoolOperatorPipePipe => self.bool(this.as_bool() || args[0].as_bool()),
            K::BoolOperatorUnaryExclaim => self.bool(!this.as_bool()),
            K::BoolToString => self.string(this.as_bool().to_string()),

            K::IntCtor => self.int(0),
            K::IntCtorBool | K::IntCtorInt | K::IntCtorDouble => self.int(args[0].as_int()),
            K::IntToString => self.string(this.as_int().to_string()),
            K::IntOperatorPlus => self.int_operator(&this, &args[0], Arithmetic::Add, false),
            K::IntOperatorMinus => self.int_operator(&this, &args[0], Arithmetic::Sub, false),
            K::IntOperatorStar => self.int_operator(&this, &args[0], Arithmetic::Mul, false),
            K::IntOperatorSlash => self.int_operator(&this, &args[0], Arithmetic::Div, false),
            K::IntOperatorPercent => self.int_operator(&this, &args[0], Arithmetic::Rem, false),
            K::IntOperatorUnaryMinus => self.int(this.as_int().wrapping_neg()),
            K::IntOperatorEqual => self.assign(&this, &args[0]),
            K::IntOperatorPlusEqual => self.int_operator(&this, &args[0], Arithmetic::Add, true),
            K::IntOperatorMinusEqual => self.int_operator(&this, &args[0], Arithmetic::Sub, true),
            K::IntOperatorStarEqual => self.int_operator(&this, &args[0], Arithmetic::Mul, true),
            K::IntOperatorSlashEqual => self.int_operator(&this, &args[0], Arithmetic::Div, true),
            K::IntOperatorPercentEqual => {
                self.int_operator(&this, &args[0], Arithmetic::Rem, true)
            }
            K::IntOperatorPlusPlus => {
                this.set_value(InstanceValue::Int(this.as_int().wrapping_add(1)));
                Some(this.alias())
            }
            K::IntOperatorMinusMinus => {
                this.set_value(InstanceValue::Int(this.as_int().wrapping_sub(1)));
                Some(this.alias())
            }
            K::IntOperatorLess => self.compare(&this, &args[0], Comparison::Less),
            K::IntOperatorLessEqual => self.compare(&this, &args[0], Comparison::LessEqual),
            K::IntOperatorGreater => self.compare(&this, &args[0], Comparison::Greater),
            K::IntOperatorGreaterEqual => self.compare(&this, &args[0], Comparison::GreaterEqual),
            K::IntOperatorEqualEqual => self.compare(&this, &args[0], Comparison::Equal),
            K::IntOperatorNotEqual => self.compare(&this, &args[0], Comparison::NotEqual),

            K::DoubleCtor => self.double(0.0),
            K::DoubleCtorDouble | K::DoubleCtorInt => self.double(args[0].as_double()),
            K::DoubleOperatorPlus => self.double_operator(&this, &args[0], Arithmetic::Add, false),
            K::DoubleOperatorMinus => self.double_operator(&this, &args[0], Arithmetic::Sub, false),
            K::DoubleOperatorStar => self.double_operator(&this, &args[0], Arithmetic::Mul, false),
            K::DoubleOperatorSlash => self.double_operator(&this, &args[0], Arithmetic::Div, false),
            K::DoubleOperatorUnaryMinus => self.double(-this.as_double()),
            K::DoubleOperatorEqual => self.assign(&this, &args[0]),
            K::DoubleOperatorPlusEqual => {
                self.double_operator(&this, &args[0], Arithmetic::Add, true)
            }
            K::DoubleOperatorMinusEqual => {
                self.double_operator(&this, &args[0], Arithmetic::Sub, true)
            }
            K::DoubleOperatorStarEqual => {
                self.double_operator(&this, &args[0], Arithmetic::Mul, true)
            }
            K::DoubleOperatorSlashEqual => {
                self.double_operator(&this, &args[0], Arithmetic::Div, true)
            }
            K::DoubleOperatorLess => self.compare(&this, &args[0], Comparison::Less),
            K::DoubleOperatorLessEqual => self.compare(&this, &args[0], Comparison::LessEqual),
            K::DoubleOperatorGreater => self.compare(&this, &args[0], Comparison::Greater),
            K::DoubleOperatorGreaterEqual => {
                self.compare(&this, &args[0], Comparison::GreaterEqual)
            }
            K::DoubleOperatorEqualEqual => self.compare(&this, &args[0], Comparison::Equal),
            K::DoubleOperatorNotEqual => self.compare(&this, &args[0], Comparison::NotEqual),
            K::DoubleToString => self.string(this.as_double().to_string()),

            K::StringCtor
            | K::StringCtorString
            | K::StringCtorStringCount
            | K::StringEmpty
            | K::StringSize
            | K::StringOperatorEqualEqual
            | K::StringOperatorNotEqual
            | K::StringOperatorLess
            | K::StringOperatorLessEqual
            | K::StringOperatorGreater
            | K::StringOperatorGreaterEqual
            | K::StringOperatorPlus
            | K::StringOperatorEqual
            | K::StringOperatorPlusEqual
            | K::StringClear
            | K::StringInsertPosStr
            | K::StringErasePos
            | K::StringErasePosCount
            | K::StringStartsWith
            | K::StringEndsWith
            | K::StringReplacePosCountStr
            | K::StringSubstrPos
            | K::StringSubstrPosCount
            | K::StringResizeNewsize
            | K::StringResizeNewsizeFill
            | K::StringFindStr
            | K::StringFindStrPos
            | K::StringFindNotOfStr
            | K::StringFindNotOfStrPos
            | K::StringFindLastStr
            | K::StringFindLastNotOfStr
            | K::StringContains
            | K::StringLower
            | K::StringMakeLower
            | K::StringUpper
            | K::StringMakeUpper => self.call_string(kind, &this, &args),

            K::VersionCtorMajor
            | K::VersionCtorMajorMinor
            | K::VersionCtorMajorMinorPatch
            | K::VersionCtorMajorMinorPatchTweak => {
                let part = |i: usize| args.get(i).map(Instance::as_int).unwrap_or(0);
                self.version(Version::new(part(0), part(1), part(2), part(3)))
            }
            K::VersionOperatorEqual => self.assign(&this, &args[0]),
            K::VersionOperatorEqualEqual => self.compare(&this, &args[0], Comparison::Equal),
            K::VersionOperatorNotEqual => self.compare(&this, &args[0], Comparison::NotEqual),
            K::VersionOperatorLess => self.compare(&this, &args[0], Comparison::Less),
            K::VersionOperatorLessEqual => self.compare(&this, &args[0], Comparison::LessEqual),
            K::VersionOperatorGreater => self.compare(&this, &args[0], Comparison::Greater),
            K::VersionOperatorGreaterEqual => {
                self.compare(&this, &args[0], Comparison::GreaterEqual)
            }
            K::VersionMajor => self.int(this.as_version().major),
            K::VersionMinor => self.int(this.as_version().minor),
            K::VersionPatch => self.int(this.as_version().patch),
            K::VersionTweak => self.int(this.as_version().tweak),
            K::VersionToString => self.string(this.as_version().to_string()),

            K::ListCtor
            | K::ListPushBackValue
            | K::ListPushBackList
            | K::ListPushFrontValue
            | K::ListPushFrontList
            | K::ListPopBack
            | K::ListPopFront
            | K::ListAt
            | K::ListFront
            | K::ListBack
            | K::ListInsertPosValue
            | K::ListInsertPosList
            | K::ListEraseFrom
            | K::ListEraseFromCount
            | K::ListRemoveValue
            | K::ListRemoveValueCount
            | K::ListRemoveLastValueCount
            | K::ListClear
            | K::ListResize
            | K::ListSort
            | K::ListReverse
            | K::ListMin
            | K::ListMax
            | K::ListSublistFrom
            | K::ListSublistFromCount
            | K::ListSize
            | K::ListEmpty
            | K::ListFindValue
            | K::ListFindValuePos
            | K::ListOperatorPlusValue
            | K::ListOperatorPlusList
            | K::ListOperatorPlusEqualValue
            | K::ListOperatorPlusEqualList
            | K::ListOperatorEqual => self.call_list(kind, &this, &args, return_type),

            K::ExternCtorName => self.create_extern(&args[0], return_type),
            K::ExternHasValue => {
                let has_value = matches!(this.object().value, InstanceValue::Extern(Some(_)));
                self.bool(has_value)
            }
            K::ExternValue => {
                let value = match &this.object().value {
                    InstanceValue::Extern(Some(value)) => Some(value.deep_copy()),
                    _ => None,
                };
                match value {
                    Some(value) => Some(value),
                    None => self.fatal("extern value accessed, but no value was provided"),
                }
            }
            K::ExternOperatorEqual => self.assign(&this, &args[0]),

            K::ProjectCtorName => {
                let name = args[0].as_string();
                self.facade.register_project(&name);
                Some(Instance::new(
                    self.builtins.project,
                    InstanceValue::Project { name },
                ))
            }
            K::ProjectName | K::TargetName => self.string(this.as_string()),
            K::ProjectAddExecutable => {
                let name = args[0].as_string();
                self.facade.add_executable(&name, &args[1].as_strings());
                Some(Instance::new(
                    self.builtins.executable,
                    InstanceValue::Target { name },
                ))
            }
            K::ProjectAddLibrary => {
                let name = args[0].as_string();
                self.facade.add_library(&name, &args[1].as_strings());
                Some(Instance::new(
                    self.builtins.library,
                    InstanceValue::Target { name },
                ))
            }
            K::ProjectOperatorEqual | K::TargetOperatorEqual => self.assign(&this, &args[0]),

            K::TargetLinkTo | K::TargetLinkToVisibility => {
                let visibility = Self::visibility_arg(&args, 1);
                self.facade.target_link_library(
                    &this.as_string(),
                    visibility,
                    &args[0].as_string(),
                );
                self.void()
            }
            K::TargetIncludeDirectories | K::TargetIncludeDirectoriesVisibility => {
                let visibility = Self::visibility_arg(&args, 1);
                self.facade.target_include_directories(
                    &this.as_string(),
                    visibility,
                    &args[0].as_strings(),
                );
                self.void()
            }
            K::TargetCompileDefinitions | K::TargetCompileDefinitionsVisibility => {
                let visibility = Self::visibility_arg(&args, 1);
                self.facade.target_compile_definitions(
                    &this.as_string(),
                    visibility,
                    &args[0].as_strings(),
                );
                self.void()
            }
            K::TargetCompileOptions | K::TargetCompileOptionsVisibility => {
                let visibility = Self::visibility_arg(&args, 1);
                self.facade.target_compile_options(
                    &this.as_string(),
                    visibility,
                    &args[0].as_strings(),
                );
                self.void()
            }
            K::TargetAddSources | K::TargetAddSourcesVisibility => {
                let visibility = Self::visibility_arg(&args, 1);
                self.facade
                    .target_sources(&this.as_string(), visibility, &args[0].as_strings());
                self.void()
            }

            K::EnumOperatorEqual | K::UserTypeOperatorEqual => self.assign(&this, &args[0]),
            K::EnumOperatorEqualEqual => self.compare(&this, &args[0], Comparison::Equal),
            K::EnumOperatorNotEqual => self.compare(&this, &args[0], Comparison::NotEqual),
            K::EnumToString => {
                let ty = self.registry.decayed(this.ty());
                let name = match &self.registry.ty(ty).kind {
                    TypeKind::Enum { enumerators } => enumerators
                        .get(this.as_enum() as usize)
                        .cloned()
                        .unwrap_or_default(),
                    _ => String::new(),
                };
                self.string(name)
            }

            _ => self.call_cmake(kind, &args),
        }
    }

    fn visibility_arg(args: &[Instance], index: usize) -> Visibility {
        args.get(index)
            .map(|v| Visibility::from_enum_value(v.as_enum()))
            .unwrap_or(Visibility::Private)
    }

    fn compare(&self, lhs: &Instance, rhs: &Instance, comparison: Comparison) -> Option<Instance> {
        let ordering = compare_values(&lhs.object().value, &rhs.object().value);
        self.bool(comparison.test(ordering))
    }

    fn int_operator(
        &mut self,
        this: &Instance,
        rhs: &Instance,
        op: Arithmetic,
        assign: bool,
    ) -> Option<Instance> {
        let Some(value) = int_arithmetic(op, this.as_int(), rhs.as_int()) else {
            return self.fatal("division by zero");
        };

        if assign {
            this.set_value(InstanceValue::Int(value));
            Some(this.alias())
        } else {
            self.int(value)
        }
    }

    fn double_operator(
        &self,
        this: &Instance,
        rhs: &Instance,
        op: Arithmetic,
        assign: bool,
    ) -> Option<Instance> {
        let value = double_arithmetic(op, this.as_double(), rhs.as_double());

        if assign {
            this.set_value(InstanceValue::Double(value));
            Some(this.alias())
        } else {
            self.double(value)
        }
    }

    /// Byte offset `pos` into `s`, checked to be on a char boundary.
    fn string_position(&mut self, s: &str, pos: i64) -> Option<usize> {
        if pos < 0 || !s.is_char_boundary(pos as usize) {
            self.fatal(&format!("string position {} is out of range", pos));
            return None;
        }
        Some(pos as usize)
    }

    /// Checks a requested string or list size before anything is allocated.
    fn container_size(&mut self, what: &str, size: i64) -> Option<usize> {
        if size < 0 {
            self.fatal(&format!("{} size {} is negative", what, size));
            return None;
        }
        match usize::try_from(size) {
            Ok(size) if size <= MAX_CONTAINER_SIZE => Some(size),
            _ => {
                self.fatal(&format!(
                    "{} size {} exceeds the limit of {}",
                    what, size, MAX_CONTAINER_SIZE
                ));
                None
            }
        }
    }

    /// End of a `count` long range starting at `pos`, clamped to the string.
    fn string_range_end(&mut self, s: &str, pos: usize, count: i64) -> Option<usize> {
        let end = (pos as i64).saturating_add(count.max(0)).min(s.len() as i64);
        self.string_position(s, end)
    }

    fn call_string(&mut self, kind: K, this: &Instance, args: &[Instance]) -> Option<Instance> {
        let s = this.as_string();

        match kind {
            K::StringCtor => self.string(String::new()),
            K::StringCtorString => self.string(args[0].as_string()),
            K::StringCtorStringCount => {
                let value = args[0].as_string();
                let count = args[1].as_int().max(0);
                let size = (value.len() as i64).checked_mul(count).unwrap_or(i64::MAX);
                self.container_size("string", size)?;
                self.string(value.repeat(count as usize))
            }
            K::StringEmpty => self.bool(s.is_empty()),
            K::StringSize => self.int(s.len() as i64),
            K::StringOperatorEqualEqual => self.compare(this, &args[0], Comparison::Equal),
            K::StringOperatorNotEqual => self.compare(this, &args[0], Comparison::NotEqual),
            K::StringOperatorLess => self.compare(this, &args[0], Comparison::Less),
            K::StringOperatorLessEqual => self.compare(this, &args[0], Comparison::LessEqual),
            K::StringOperatorGreater => self.compare(this, &args[0], Comparison::Greater),
            K::StringOperatorGreaterEqual => self.compare(this, &args[0], Comparison::GreaterEqual),
            K::StringOperatorPlus => self.string(s + &args[0].as_string()),
            K::StringOperatorEqual => self.assign(this, &args[0]),
            K::StringOperatorPlusEqual => {
                this.set_value(InstanceValue::String(s + &args[0].as_string()));
                Some(this.alias())
            }
            K::StringClear => {
                this.set_value(InstanceValue::String(String::new()));
                self.void()
            }
            K::StringInsertPosStr => {
                let pos = self.string_position(&s, args[0].as_int())?;
                let mut s = s;
                s.insert_str(pos, &args[1].as_string());
                this.set_value(InstanceValue::String(s));
                self.void()
            }
            K::StringErasePos | K::StringErasePosCount => {
                let pos = self.string_position(&s, args[0].as_int())?;
                let count = args.get(1).map(Instance::as_int).unwrap_or(i64::MAX);
                let end = self.string_range_end(&s, pos, count)?;
                let mut s = s;
                s.replace_range(pos..end, "");
                this.set_value(InstanceValue::String(s));
                self.void()
            }
            K::StringStartsWith => self.bool(s.starts_with(&args[0].as_string())),
            K::StringEndsWith => self.bool(s.ends_with(&args[0].as_string())),
            K::StringReplacePosCountStr => {
                let pos = self.string_position(&s, args[0].as_int())?;
                let end = self.string_range_end(&s, pos, args[1].as_int())?;
                let mut s = s;
                s.replace_range(pos..end, &args[2].as_string());
                this.set_value(InstanceValue::String(s));
                self.void()
            }
            K::StringSubstrPos | K::StringSubstrPosCount => {
                let pos = self.string_position(&s, args[0].as_int())?;
                let count = args.get(1).map(Instance::as_int).unwrap_or(i64::MAX);
                let end = self.string_range_end(&s, pos, count)?;
                self.string(String::from(&s[pos..end]))
            }
            K::StringResizeNewsize | K::StringResizeNewsizeFill => {
                let size = self.container_size("string", args[0].as_int())?;

                let mut s = s;
                if size <= s.len() {
                    let end = self.string_position(&s, size as i64)?;
                    s.truncate(end);
                } else {
                    let fill = match args.get(1) {
                        Some(fill) => fill.as_string(),
                        None => String::from("\0"),
                    };
                    let mut padding = fill.chars().cycle();
                    while s.len() < size {
                        match padding.next() {
                            Some(c) => s.push(c),
                            None => break,
                        }
                    }
                }
                this.set_value(InstanceValue::String(s));
                self.void()
            }
            K::StringFindStr | K::StringFindStrPos => {
                let from = args.get(1).map(Instance::as_int).unwrap_or(0);
                let from = self.string_position(&s, from)?;
                let found = s[from..].find(&args[0].as_string()).map(|i| i + from);
                self.int(index_or_minus_one(found))
            }
            K::StringFindNotOfStr | K::StringFindNotOfStrPos => {
                let from = args.get(1).map(Instance::as_int).unwrap_or(0);
                let from = self.string_position(&s, from)?;
                let found = find_char(&s, &args[0].as_string(), from, false);
                self.int(index_or_minus_one(found))
            }
            K::StringFindLastStr => self.int(index_or_minus_one(s.rfind(&args[0].as_string()))),
            K::StringFindLastNotOfStr => {
                let set = args[0].as_string();
                let found = s
                    .char_indices()
                    .rev()
                    .find(|(_, c)| !set.contains(*c))
                    .map(|(i, _)| i);
                self.int(index_or_minus_one(found))
            }
            K::StringContains => self.bool(s.contains(&args[0].as_string())),
            K::StringLower => self.string(s.to_lowercase()),
            K::StringMakeLower => {
                this.set_value(InstanceValue::String(s.to_lowercase()));
                self.void()
            }
            K::StringUpper => self.string(s.to_uppercase()),
            K::StringMakeUpper => {
                this.set_value(InstanceValue::String(s.to_uppercase()));
                self.void()
            }
            _ => self.fatal(&format!("{:?} is not a string function", kind)),
        }
    }

    /// Checks `pos` against `0..=len`.
    fn list_position(&mut self, len: usize, pos: i64) -> Option<usize> {
        if pos < 0 || pos as usize > len {
            self.fatal(&format!("list index {} is out of range", pos));
            return None;
        }
        Some(pos as usize)
    }

    /// Checks `pos` against `0..len`.
    fn list_element(&mut self, len: usize, pos: i64) -> Option<usize> {
        if pos < 0 || pos as usize >= len {
            self.fatal(&format!("list index {} is out of range", pos));
            return None;
        }
        Some(pos as usize)
    }

    fn list(&self, ty: TypeId, values: Vec<Instance>) -> Option<Instance> {
        Some(Instance::new(ty, InstanceValue::List(values)))
    }

    fn list_value_type(&self, list: TypeId) -> TypeId {
        match self.registry.ty(self.registry.decayed(list)).kind {
            TypeKind::List { value } => value,
            _ => self.builtins.void,
        }
    }

    fn call_list(
        &mut self,
        kind: K,
        this: &Instance,
        args: &[Instance],
        return_type: TypeId,
    ) -> Option<Instance> {
        if kind == K::ListCtor {
            return self.list(self.registry.decayed(return_type), vec![]);
        }

        let mut values = this.as_list();
        let len = values.len();
        let list_ty = this.object().ty;
        let copies = |list: &Instance| -> Vec<Instance> {
            list.as_list().iter().map(Instance::deep_copy).collect()
        };

        match kind {
            K::ListAt => {
                let pos = self.list_element(len, args[0].as_int())?;
                return Some(values[pos].alias());
            }
            K::ListFront | K::ListBack => {
                let element = match kind {
                    K::ListFront => values.first(),
                    _ => values.last(),
                };
                return match element {
                    Some(element) => Some(element.alias()),
                    None => self.fatal("list is empty"),
                };
            }
            K::ListMin | K::ListMax => {
                let pick = if kind == K::ListMin {
                    Ordering::Less
                } else {
                    Ordering::Greater
                };
                let chosen = values.iter().fold(None::<&Instance>, |best, v| match best {
                    Some(b) if compare_values(&v.object().value, &b.object().value) != Some(pick) => {
                        Some(b)
                    }
                    _ => Some(v),
                });
                return match chosen {
                    Some(value) => Some(value.deep_copy()),
                    None => self.fatal("list is empty"),
                };
            }
            K::ListSublistFrom | K::ListSublistFromCount => {
                let from = self.list_position(len, args[0].as_int())?;
                let count = args.get(1).map(Instance::as_int).unwrap_or(i64::MAX).max(0);
                let end = (from as i64).saturating_add(count).min(len as i64) as usize;
                let sublist = values[from..end].iter().map(Instance::deep_copy).collect();
                return self.list(list_ty, sublist);
            }
            K::ListSize => return self.int(len as i64),
            K::ListEmpty => return self.bool(values.is_empty()),
            K::ListFindValue | K::ListFindValuePos => {
                let from = args.get(1).map(Instance::as_int).unwrap_or(0);
                let from = self.list_position(len, from)?;
                let found = values[from..]
                    .iter()
                    .position(|v| *v == args[0])
                    .map(|i| i + from);
                return self.int(index_or_minus_one(found));
            }
            K::ListOperatorPlusValue => {
                let mut result: Vec<Instance> = values.iter().map(Instance::deep_copy).collect();
                result.push(args[0].deep_copy());
                return self.list(list_ty, result);
            }
            K::ListOperatorPlusList => {
                let mut result: Vec<Instance> = values.iter().map(Instance::deep_copy).collect();
                result.extend(copies(&args[0]));
                return self.list(list_ty, result);
            }
            K::ListOperatorEqual => return self.assign(this, &args[0]),
            _ => {}
        }

        let result = match kind {
            K::ListPushBackValue | K::ListOperatorPlusEqualValue => {
                values.push(args[0].deep_copy());
                None
            }
            K::ListPushBackList | K::ListOperatorPlusEqualList => {
                values.extend(copies(&args[0]));
                None
            }
            K::ListPushFrontValue => {
                values.insert(0, args[0].deep_copy());
                None
            }
            K::ListPushFrontList => {
                values.splice(0..0, copies(&args[0]));
                None
            }
            K::ListPopBack | K::ListPopFront => {
                if values.is_empty() {
                    return self.fatal("pop from an empty list");
                }
                if kind == K::ListPopBack {
                    values.pop();
                } else {
                    values.remove(0);
                }
                None
            }
            K::ListInsertPosValue => {
                let pos = self.list_position(len, args[0].as_int())?;
                values.insert(pos, args[1].deep_copy());
                None
            }
            K::ListInsertPosList => {
                let pos = self.list_position(len, args[0].as_int())?;
                values.splice(pos..pos, copies(&args[1]));
                None
            }
            K::ListEraseFrom => {
                let pos = self.list_element(len, args[0].as_int())?;
                values.remove(pos);
                None
            }
            K::ListEraseFromCount => {
                let pos = self.list_position(len, args[0].as_int())?;
                let count = args[1].as_int().max(0);
                let end = (pos as i64).saturating_add(count).min(len as i64) as usize;
                values.drain(pos..end);
                None
            }
            K::ListRemoveValue | K::ListRemoveValueCount => {
                let limit = args.get(1).map(Instance::as_int).unwrap_or(i64::MAX);
                let mut removed = 0;
                values.retain(|v| {
                    if removed < limit && *v == args[0] {
                        removed += 1;
                        false
                    } else {
                        true
                    }
                });
                Some(removed)
            }
            K::ListRemoveLastValueCount => {
                let limit = args[1].as_int();
                let mut removed = 0;
                let mut index = values.len();
                while index > 0 && removed < limit {
                    index -= 1;
                    if values[index] == args[0] {
                        values.remove(index);
                        removed += 1;
                    }
                }
                Some(removed)
            }
            K::ListClear => {
                values.clear();
                None
            }
            K::ListResize => {
                let size = self.container_size("list", args[0].as_int())?;
                let value_ty = self.list_value_type(list_ty);
                let registry = self.registry;
                values.resize_with(size, || create_default(registry, value_ty));
                None
            }
            K::ListSort => {
                values.sort_by(|a, b| {
                    compare_values(&a.object().value, &b.object().value).unwrap_or(Ordering::Equal)
                });
                None
            }
            K::ListReverse => {
                values.reverse();
                None
            }
            _ => return self.fatal(&format!("{:?} is not a list function", kind)),
        };

        this.set_value(InstanceValue::List(values));

        match kind {
            K::ListOperatorPlusEqualValue | K::ListOperatorPlusEqualList => Some(this.alias()),
            _ => match result {
                Some(removed) => self.int(removed),
                None => self.void(),
            },
        }
    }

    fn create_extern(&mut self, name: &Instance, extern_type: TypeId) -> Option<Instance> {
        let extern_type = self.registry.decayed(extern_type);
        let value_type = match self.registry.ty(extern_type).kind {
            TypeKind::Extern { value } => value,
            _ => return self.fatal("extern of a non extern type"),
        };

        let name = name.as_string();
        let define = self.facade.try_get_extern_define(&name);
        let value = define.and_then(|define| {
            let value = match self.registry.ty(value_type).kind {
                TypeKind::Bool => InstanceValue::Bool(parse_extern_bool(&define)?),
                TypeKind::Int => InstanceValue::Int(define.trim().parse().ok()?),
                TypeKind::Double => InstanceValue::Double(define.trim().parse().ok()?),
                _ => InstanceValue::String(define),
            };
            Some(Instance::new(value_type, value))
        });

        trace!(name = %name, found = value.is_some(), "extern define");
        Some(Instance::new(extern_type, InstanceValue::Extern(value)))
    }

    fn call_cmake(&mut self, kind: K, args: &[Instance]) -> Option<Instance> {
        match kind {
            K::CmakeMessage => self.facade.message(&args[0].as_string()),
            K::CmakeWarning => self.facade.warning(&args[0].as_string()),
            K::CmakeError => self.facade.error(&args[0].as_string()),
            K::CmakeFatalError => self.facade.fatal_error(&args[0].as_string()),
            K::CmakeMinimumRequired => {
                let required = args[0].as_version();
                let current = self.facade.cmake_version();
                if current < required {
                    return self.fatal(&format!(
                        "CMake version {} is required, but {} is used",
                        required, current
                    ));
                }
            }
            K::CmakeGetCmakeVersion => return self.version(self.facade.cmake_version()),
            K::CmakeInstall => self.facade.install(&args[0].as_string(), "bin"),
            K::CmakeInstallDestination => self
                .facade
                .install(&args[0].as_string(), &args[1].as_string()),
            K::CmakeEnableCtest => self.facade.enable_ctest(),
            K::CmakeAddTest => self.facade.add_test(&args[0].as_string()),
            K::CmakeCurrentSourceDir => return self.string(self.facade.current_source_dir()),
            K::CmakeCurrentBinaryDir => return self.string(self.facade.current_binary_dir()),
            K::CmakeRootSourceDir => return self.string(self.facade.root_source_dir()),
            K::CmakeOption => {
                let name = args[0].as_string();
                let value = self
                    .facade
                    .get_option_value(&name)
                    .unwrap_or_else(|| args[2].as_bool());
                self.facade
                    .register_option(&name, &args[1].as_string(), value);
                return self.bool(value);
            }
            K::CmakeSetOldStyleVariable => self
                .facade
                .set_old_style_variable(&args[0].as_string(), &args[1].as_string()),
            K::CmakeGetOldStyleVariable => {
                let value = self
                    .facade
                    .get_old_style_variable(&args[0].as_string())
                    .unwrap_or_default();
                return self.string(value);
            }
            K::CmakeMakeDirectory => self.facade.make_directory(&args[0].as_string()),
            K::CmakeAddCustomCommand => self
                .facade
                .add_custom_command(&args[0].as_strings(), &args[1].as_string()),
            K::CmakeAddCustomTarget => self
                .facade
                .add_custom_target(&args[0].as_string(), &args[1].as_strings()),
            K::CmakeSetProperty => self
                .facade
                .set_property(&args[0].as_string(), &args[1].as_string()),
            K::CmakeCtestCommand => return self.string(self.facade.ctest_command()),
            K::CmakeSystemName => {
                return self.string(String::from(self.facade.system_info().name()))
            }
            K::CmakeCxxCompilerName => {
                return self.string(String::from(self.facade.cxx_compiler_info().name()))
            }
            _ => return self.fatal(&format!("{:?} is not a cmake function", kind)),
        }

        self.void()
    }
}
