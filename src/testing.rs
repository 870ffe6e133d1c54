//! Host framework doubles shared by the unit tests
//!
//! A small typed flag set and command, just enough to stand in for a real
//! argument parser: scalar cells that parse text, booleans or integers, and
//! list cells with optional integer validation.

use crate::command::{Command, CommandId, PreRunStage};
use crate::flag::{Flag, ListValue, ScalarValue, ValueError, ValueMut};

#[derive(Debug, Clone, Copy)]
enum ScalarKind {
    Text,
    Bool,
    Int,
}

struct ScalarCell {
    kind: ScalarKind,
    value: String,
}

impl ScalarValue for ScalarCell {
    fn set(&mut self, input: &str) -> Result<(), ValueError> {
        match self.kind {
            ScalarKind::Text => {}
            ScalarKind::Bool => {
                input
                    .parse::<bool>()
                    .map_err(|_| ValueError::new(format!("invalid boolean value '{}'", input)))?;
            }
            ScalarKind::Int => {
                input
                    .parse::<i64>()
                    .map_err(|_| ValueError::new(format!("invalid integer value '{}'", input)))?;
            }
        }
        self.value = input.to_string();
        Ok(())
    }
}

struct ListCell {
    numeric: bool,
    items: Vec<String>,
}

impl ListValue for ListCell {
    fn reset(&mut self) -> Result<(), ValueError> {
        self.items.clear();
        Ok(())
    }

    fn append(&mut self, input: &str) -> Result<(), ValueError> {
        if self.numeric {
            input
                .parse::<i64>()
                .map_err(|_| ValueError::new(format!("invalid integer value '{}'", input)))?;
        }
        self.items.push(input.to_string());
        Ok(())
    }
}

enum TestCell {
    Scalar(ScalarCell),
    List(ListCell),
}

pub(crate) struct TestFlag {
    name: String,
    usage: String,
    changed: bool,
    no_arg_default: Option<String>,
    cell: TestCell,
}

impl Flag for TestFlag {
    fn name(&self) -> &str {
        &self.name
    }

    fn usage(&self) -> &str {
        &self.usage
    }

    fn changed(&self) -> bool {
        self.changed
    }

    fn value_string(&self) -> String {
        match &self.cell {
            TestCell::Scalar(cell) => cell.value.clone(),
            TestCell::List(cell) => format!("[{}]", cell.items.join(",")),
        }
    }

    fn no_arg_default(&self) -> Option<&str> {
        self.no_arg_default.as_deref()
    }

    fn value_mut(&mut self) -> ValueMut<'_> {
        match &mut self.cell {
            TestCell::Scalar(cell) => ValueMut::Scalar(cell),
            TestCell::List(cell) => ValueMut::List(cell),
        }
    }
}

pub(crate) struct TestCommand {
    id: CommandId,
    flags: Vec<TestFlag>,
    pre_run: Vec<PreRunStage>,
}

impl TestCommand {
    pub fn new(id: u64) -> Self {
        Self {
            id: CommandId::new(id),
            flags: Vec::new(),
            pre_run: Vec::new(),
        }
    }

    pub fn add_text_flag(&mut self, name: &str, usage: &str) {
        self.add_scalar(name, usage, ScalarKind::Text, "");
    }

    pub fn add_bool_flag(&mut self, name: &str, usage: &str) {
        self.add_scalar(name, usage, ScalarKind::Bool, "false");
    }

    pub fn add_int_flag(&mut self, name: &str, usage: &str) {
        self.add_scalar(name, usage, ScalarKind::Int, "0");
    }

    pub fn add_list_flag(&mut self, name: &str, usage: &str, defaults: &[&str]) {
        self.flags.push(TestFlag {
            name: name.to_string(),
            usage: usage.to_string(),
            changed: false,
            no_arg_default: None,
            cell: TestCell::List(ListCell {
                numeric: false,
                items: defaults.iter().map(|d| d.to_string()).collect(),
            }),
        });
    }

    pub fn add_int_list_flag(&mut self, name: &str, usage: &str) {
        self.flags.push(TestFlag {
            name: name.to_string(),
            usage: usage.to_string(),
            changed: false,
            no_arg_default: None,
            cell: TestCell::List(ListCell {
                numeric: true,
                items: Vec::new(),
            }),
        });
    }

    /// Stores a value the way the host's argv parsing would: the value is
    /// written and the flag counts as explicitly set.
    pub fn set_parsed(&mut self, name: &str, value: &str) {
        let flag = self.flag_named(name);
        match &mut flag.cell {
            TestCell::Scalar(cell) => cell.value = value.to_string(),
            TestCell::List(cell) => cell.items = vec![value.to_string()],
        }
        flag.changed = true;
    }

    /// Stores a value without marking the flag as set, like a default.
    pub fn set_initial_value(&mut self, name: &str, value: &str) {
        let flag = self.flag_named(name);
        match &mut flag.cell {
            TestCell::Scalar(cell) => cell.value = value.to_string(),
            TestCell::List(cell) => cell.items = vec![value.to_string()],
        }
    }

    pub fn set_no_arg_default(&mut self, name: &str, sentinel: &str) {
        self.flag_named(name).no_arg_default = Some(sentinel.to_string());
    }

    pub fn scalar_value(&self, name: &str) -> String {
        match &self.flag_ref(name).cell {
            TestCell::Scalar(cell) => cell.value.clone(),
            TestCell::List(_) => panic!("flag '{}' is a list", name),
        }
    }

    pub fn list_values(&self, name: &str) -> Vec<String> {
        match &self.flag_ref(name).cell {
            TestCell::List(cell) => cell.items.clone(),
            TestCell::Scalar(_) => panic!("flag '{}' is a scalar", name),
        }
    }

    fn add_scalar(&mut self, name: &str, usage: &str, kind: ScalarKind, initial: &str) {
        self.flags.push(TestFlag {
            name: name.to_string(),
            usage: usage.to_string(),
            changed: false,
            no_arg_default: None,
            cell: TestCell::Scalar(ScalarCell {
                kind,
                value: initial.to_string(),
            }),
        });
    }

    fn flag_named(&mut self, name: &str) -> &mut TestFlag {
        self.flags
            .iter_mut()
            .find(|f| f.name == name)
            .unwrap_or_else(|| panic!("no test flag named '{}'", name))
    }

    fn flag_ref(&self, name: &str) -> &TestFlag {
        self.flags
            .iter()
            .find(|f| f.name == name)
            .unwrap_or_else(|| panic!("no test flag named '{}'", name))
    }
}

impl Command for TestCommand {
    fn id(&self) -> CommandId {
        self.id
    }

    fn flag_mut(&mut self, name: &str) -> Option<&mut dyn Flag> {
        self.flags
            .iter_mut()
            .find(|f| f.name == name)
            .map(|f| f as &mut dyn Flag)
    }

    fn pre_run_mut(&mut self) -> &mut Vec<PreRunStage> {
        &mut self.pre_run
    }
}
