/// Every primitive operation the interpreter implements natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinFunctionKind {
    // bool
    BoolCtor,
    BoolCtorBool,
    BoolCtorInt,
    BoolOperatorEqual,
    BoolOperatorEqualEqual,
    BoolOperatorNotEqual,
    BoolOperatorAndAnd,
    BoolOperatorPipePipe,
    BoolOperatorUnaryExclaim,
    BoolToString,

    // int
    IntCtor,
    IntCtorBool,
    IntCtorInt,
    IntCtorDouble,
    IntToString,
    IntOperatorPlus,
    IntOperatorMinus,
    IntOperatorUnaryMinus,
    IntOperatorStar,
    IntOperatorSlash,
    IntOperatorPercent,
    IntOperatorEqual,
    IntOperatorPlusEqual,
    IntOperatorMinusEqual,
    IntOperatorStarEqual,
    IntOperatorSlashEqual,
    IntOperatorPercentEqual,
    IntOperatorPlusPlus,
    IntOperatorMinusMinus,
    IntOperatorLess,
    IntOperatorLessEqual,
    IntOperatorGreater,
    IntOperatorGreaterEqual,
    IntOperatorEqualEqual,
    IntOperatorNotEqual,

    // double
    DoubleCtor,
    DoubleCtorDouble,
    DoubleCtorInt,
    DoubleOperatorPlus,
    DoubleOperatorMinus,
    DoubleOperatorUnaryMinus,
    DoubleOperatorStar,
    DoubleOperatorSlash,
    DoubleOperatorEqual,
    DoubleOperatorPlusEqual,
    DoubleOperatorMinusEqual,
    DoubleOperatorStarEqual,
    DoubleOperatorSlashEqual,
    DoubleOperatorLess,
    DoubleOperatorLessEqual,
    DoubleOperatorGreater,
    DoubleOperatorGreaterEqual,
    DoubleOperatorEqualEqual,
    DoubleOperatorNotEqual,
    DoubleToString,

    // string
    StringCtor,
    StringCtorString,
    StringCtorStringCount,
    StringEmpty,
    StringSize,
    StringOperatorEqualEqual,
    StringOperatorNotEqual,
    StringOperatorLess,
    StringOperatorLessEqual,
    StringOperatorGreater,
    StringOperatorGreaterEqual,
    StringOperatorPlus,
    StringOperatorEqual,
    StringOperatorPlusEqual,
    StringClear,
    StringInsertPosStr,
    StringErasePos,
    StringErasePosCount,
    StringStartsWith,
    StringEndsWith,
    StringReplacePosCountStr,
    StringSubstrPos,
    StringSubstrPosCount,
    StringResizeNewsize,
    StringResizeNewsizeFill,
    StringFindStr,
    StringFindStrPos,
    StringFindNotOfStr,
    StringFindNotOfStrPos,
    StringFindLastStr,
    StringFindLastNotOfStr,
    StringContains,
    StringLower,
    StringMakeLower,
    StringUpper,
    StringMakeUpper,

    // version
    VersionCtorMajor,
    VersionCtorMajorMinor,
    VersionCtorMajorMinorPatch,
    VersionCtorMajorMinorPatchTweak,
    VersionOperatorEqual,
    VersionOperatorEqualEqual,
    VersionOperatorNotEqual,
    VersionOperatorLess,
    VersionOperatorLessEqual,
    VersionOperatorGreater,
    VersionOperatorGreaterEqual,
    VersionMajor,
    VersionMinor,
    VersionPatch,
    VersionTweak,
    VersionToString,

    // list<T>
    ListCtor,
    ListPushBackValue,
    ListPushBackList,
    ListPushFrontValue,
    ListPushFrontList,
    ListPopBack,
    ListPopFront,
    ListAt,
    ListFront,
    ListBack,
    ListInsertPosValue,
    ListInsertPosList,
    ListEraseFrom,
    ListEraseFromCount,
    ListRemoveValue,
    ListRemoveValueCount,
    ListRemoveLastValueCount,
    ListClear,
    ListResize,
    ListSort,
    ListReverse,
    ListMin,
    ListMax,
    ListSublistFrom,
    ListSublistFromCount,
    ListSize,
    ListEmpty,
    ListFindValue,
    ListFindValuePos,
    ListOperatorPlusValue,
    ListOperatorPlusList,
    ListOperatorPlusEqualValue,
    ListOperatorPlusEqualList,
    ListOperatorEqual,

    // extern<T>
    ExternCtorName,
    ExternHasValue,
    ExternValue,
    ExternOperatorEqual,

    // cmake::project
    ProjectCtorName,
    ProjectName,
    ProjectAddExecutable,
    ProjectAddLibrary,
    ProjectOperatorEqual,

    // cmake::target and derived
    TargetName,
    TargetLinkTo,
    TargetLinkToVisibility,
    TargetIncludeDirectories,
    TargetIncludeDirectoriesVisibility,
    TargetCompileDefinitions,
    TargetCompileDefinitionsVisibility,
    TargetCompileOptions,
    TargetCompileOptionsVisibility,
    TargetAddSources,
    TargetAddSourcesVisibility,
    TargetOperatorEqual,

    // enums
    EnumOperatorEqual,
    EnumOperatorEqualEqual,
    EnumOperatorNotEqual,
    EnumToString,

    // user classes
    UserTypeOperatorEqual,

    // cmake:: free functions
    CmakeMessage,
    CmakeWarning,
    CmakeError,
    CmakeFatalError,
    CmakeMinimumRequired,
    CmakeGetCmakeVersion,
    CmakeInstall,
    CmakeInstallDestination,
    CmakeEnableCtest,
    CmakeAddTest,
    CmakeCurrentSourceDir,
    CmakeCurrentBinaryDir,
    CmakeRootSourceDir,
    CmakeOption,
    CmakeSetOldStyleVariable,
    CmakeGetOldStyleVariable,
    CmakeMakeDirectory,
    CmakeAddCustomCommand,
    CmakeAddCustomTarget,
    CmakeSetProperty,
    CmakeCtestCommand,
    CmakeSystemName,
    CmakeCxxCompilerName,
}
