use crate::filter::condition::{
    format_value, parse_value, FilterCondition, FilterOperand, FilterOperator, FilterType,
    OperandArity, ValueParseError,
};

/// Outcome of committing a filter editor's staged state
///
/// Clear removes the column's filter; Incomplete and Invalid leave the
/// committed filter untouched and keep the editor open.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterEdit {
    Apply(FilterCondition),
    Clear,
    Incomplete,
    Invalid(String),
}

/// Staged, uncommitted state of one column's filter editor
///
/// Values are edited locally and only turned into a condition on commit;
/// nothing here touches the committed filter map.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterDraft {
    pub column: String,
    pub filter_type: FilterType,
    pub operator: FilterOperator,
    pub value: String,
    /// Upper bound for the range operators
    pub second_value: String,
}

impl FilterDraft {
    pub fn new(column: impl Into<String>, filter_type: FilterType) -> Self {
        Self {
            column: column.into(),
            filter_type,
            operator: filter_type.legal_operators()[0],
            value: String::new(),
            second_value: String::new(),
        }
    }

    /// Seed a draft from the column's committed condition, if any
    ///
    /// Called when the editor opens or switches column, never per keystroke.
    pub fn from_condition(
        column: impl Into<String>,
        filter_type: FilterType,
        existing: Option<&FilterCondition>,
    ) -> Self {
        let mut draft = Self::new(column, filter_type);

        if let Some(FilterCondition::Compare {
            column: col,
            operator,
            operand,
        }) = existing
        {
            if *col == draft.column && filter_type.allows(*operator) {
                draft.operator = *operator;
                match operand {
                    FilterOperand::None => {}
                    FilterOperand::Single(v) => draft.value = format_value(v),
                    FilterOperand::List(vs) => {
                        draft.value = vs
                            .iter()
                            .map(format_value)
                            .collect::<Vec<_>>()
                            .join(", ");
                    }
                    FilterOperand::Range(lo, hi) => {
                        draft.value = format_value(lo);
                        draft.second_value = format_value(hi);
                    }
                }
            }
        }

        draft
    }

    /// Step the operator through the column's legal set
    pub fn cycle_operator(&mut self, forward: bool) {
        let ops = self.filter_type.legal_operators();
        let idx = ops
            .iter()
            .position(|op| *op == self.operator)
            .unwrap_or(0);
        let next = if forward {
            (idx + 1) % ops.len()
        } else {
            (idx + ops.len() - 1) % ops.len()
        };
        self.operator = ops[next];
    }

    /// Turn the staged state into a committable edit
    pub fn commit(&self) -> FilterEdit {
        if !self.filter_type.allows(self.operator) {
            return FilterEdit::Invalid(format!(
                "{} is not valid for this column",
                self.operator
            ));
        }

        match self.operator.arity() {
            // Any entered text is ignored for the null checks
            OperandArity::None => FilterEdit::Apply(FilterCondition::compare(
                self.column.clone(),
                self.operator,
                FilterOperand::None,
            )),
            OperandArity::List => self.commit_list(),
            OperandArity::Pair => self.commit_range(),
            OperandArity::Single => self.commit_single(),
        }
    }

    fn commit_single(&self) -> FilterEdit {
        match parse_value(self.filter_type, &self.value) {
            // Typed nothing with a value-carrying operator: the filter goes away
            Err(ValueParseError::Empty) => FilterEdit::Clear,
            Err(ValueParseError::Invalid) => {
                FilterEdit::Invalid(format!("cannot parse {:?}", self.value.trim()))
            }
            Ok(value) => {
                let value = self.wrap_pattern(value);
                FilterEdit::Apply(FilterCondition::compare(
                    self.column.clone(),
                    self.operator,
                    FilterOperand::Single(value),
                ))
            }
        }
    }

    fn commit_list(&self) -> FilterEdit {
        let tokens: Vec<&str> = self
            .value
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();

        if tokens.is_empty() {
            return FilterEdit::Clear;
        }

        let mut values = Vec::with_capacity(tokens.len());
        for token in tokens {
            match parse_value(self.filter_type, token) {
                Ok(v) => values.push(v),
                Err(_) => return FilterEdit::Invalid(format!("cannot parse {:?}", token)),
            }
        }

        FilterEdit::Apply(FilterCondition::compare(
            self.column.clone(),
            self.operator,
            FilterOperand::List(values),
        ))
    }

    fn commit_range(&self) -> FilterEdit {
        let lo_empty = self.value.trim().is_empty();
        let hi_empty = self.second_value.trim().is_empty();

        if lo_empty && hi_empty {
            return FilterEdit::Clear;
        }
        // A half-entered range is not committed; the editor stays open
        if lo_empty || hi_empty {
            return FilterEdit::Incomplete;
        }

        let lo = match parse_value(self.filter_type, &self.value) {
            Ok(v) => v,
            Err(_) => return FilterEdit::Invalid(format!("cannot parse {:?}", self.value.trim())),
        };
        let hi = match parse_value(self.filter_type, &self.second_value) {
            Ok(v) => v,
            Err(_) => {
                return FilterEdit::Invalid(format!("cannot parse {:?}", self.second_value.trim()))
            }
        };

        FilterEdit::Apply(FilterCondition::compare(
            self.column.clone(),
            self.operator,
            FilterOperand::Range(lo, hi),
        ))
    }

    /// LIKE-family operands get %...% wildcards unless the user wrote their own
    fn wrap_pattern(&self, value: crate::filter::FilterValue) -> crate::filter::FilterValue {
        use crate::filter::FilterValue;
        use FilterOperator::*;

        if !matches!(self.operator, Like | NotLike | ILike | NotILike) {
            return value;
        }
        match value {
            FilterValue::Text(t) if !t.contains('%') => FilterValue::Text(format!("%{}%", t)),
            other => other,
        }
    }
}
