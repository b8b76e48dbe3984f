use slim_codec::SlimValue;

/// One decoded SLIM instruction, tagged by its second wire element.
///
/// Every variant carries the opaque `id` echoed back in the result row;
/// `Unknown` carries whatever tag the client sent so the caller can report
/// `INVALID_STATEMENT <tag>` without the factory needing to know the
/// well-known tag strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Import {
        id: String,
        target: String,
    },
    Make {
        id: String,
        instance_name: String,
        class_name: String,
        args: Vec<SlimValue>,
    },
    Call {
        id: String,
        instance_name: String,
        method_name: String,
        args: Vec<SlimValue>,
    },
    CallAndAssign {
        id: String,
        symbol_name: String,
        instance_name: String,
        method_name: String,
        args: Vec<SlimValue>,
    },
    Unknown {
        id: String,
        tag: String,
    },
}

impl Instruction {
    pub fn id(&self) -> &str {
        match self {
            Instruction::Import { id, .. }
            | Instruction::Make { id, .. }
            | Instruction::Call { id, .. }
            | Instruction::CallAndAssign { id, .. }
            | Instruction::Unknown { id, .. } => id,
        }
    }
}

fn text(list: &[SlimValue], index: usize) -> String {
    list.get(index)
        .and_then(SlimValue::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Parses one decoded instruction list (element 0 is the id, element 1 the
/// kind tag) into a typed [`Instruction`]. Any tag other than the four
/// well-known ones becomes `Unknown`, per spec.md §4.5.
pub fn parse(list: &[SlimValue]) -> Instruction {
    let id = text(list, 0);
    let tag = text(list, 1);

    match tag.as_str() {
        "import" => Instruction::Import {
            id,
            target: text(list, 2),
        },
        "make" => Instruction::Make {
            id,
            instance_name: text(list, 2),
            class_name: text(list, 3),
            args: list.get(4..).map(<[SlimValue]>::to_vec).unwrap_or_default(),
        },
        "call" => Instruction::Call {
            id,
            instance_name: text(list, 2),
            method_name: text(list, 3),
            args: list.get(4..).map(<[SlimValue]>::to_vec).unwrap_or_default(),
        },
        "callAndAssign" => Instruction::CallAndAssign {
            id,
            symbol_name: text(list, 2),
            instance_name: text(list, 3),
            method_name: text(list, 4),
            args: list.get(5..).map(<[SlimValue]>::to_vec).unwrap_or_default(),
        },
        other => Instruction::Unknown {
            id,
            tag: other.to_string(),
        },
    }
}
