define_msg! { pub NoFileForSpan:
    "ko" => "주어진 코드 범위에 대응하는 소스 파일이 존재하지 않습니다",
    _    => "There exists no source file corresponding to given span",
}

// lexer messages

define_msg! { pub InvalidCharacter { ch: String }:
    "ko" => "잘못된 문자 {ch}가 파일에 포함되어 있습니다",
    _    => "The file contains an invalid character {ch}",
}

define_msg! { pub InvalidCharacterLiteral:
    "ko" => "문자 리터럴에는 정확히 한 글자가 있어야 합니다",
    _    => "A character literal should contain exactly one character",
}

define_msg! { pub InvalidEscape { ch: String }:
    "ko" => "알 수 없는 이스케이프 문자 `\\{ch}`가 리터럴에 포함되어 있습니다",
    _    => "Unrecognized escape sequence `\\{ch}` in a literal",
}

define_msg! { pub UnexpectedEof:
    "ko" => "리터럴이나 주석을 읽던 중 파일이 끝났습니다",
    _    => "Premature end of file in a literal or comment",
}
