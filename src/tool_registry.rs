use crate::tools::{AbsenceType, DataResolver, Table, ToolError};
use crate::types::FunctionCall;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;
use tracing::warn;

pub type ToolHandler = fn(&DataResolver, &str) -> Result<String, ToolError>;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Tool '{0}' is declared more than once")]
    Duplicate(String),
}

#[derive(Clone, Debug)]
pub struct ToolDeclaration {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Option<Value>,
}

impl ToolDeclaration {
    fn schema(&self) -> Value {
        let mut function = serde_json::json!({
            "name": self.name,
            "description": self.description,
        });
        if let Some(parameters) = &self.parameters {
            function["parameters"] = parameters.clone();
        }
        serde_json::json!({
            "type": "function",
            "function": function,
        })
    }
}

#[derive(Clone)]
struct RegisteredTool {
    declaration: ToolDeclaration,
    handler: ToolHandler,
}

/// Declarations the model sees, each paired with the handler that resolves it.
#[derive(Clone)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    by_name: HashMap<&'static str, usize>,
    schemas: Value,
}

impl ToolRegistry {
    pub fn new() -> Result<Self, RegistryError> {
        Self::from_tools(builtin_tools())
    }

    pub fn from_tools(tools: Vec<(ToolDeclaration, ToolHandler)>) -> Result<Self, RegistryError> {
        let mut registered = Vec::with_capacity(tools.len());
        let mut by_name = HashMap::new();
        for (declaration, handler) in tools {
            if by_name.insert(declaration.name, registered.len()).is_some() {
                return Err(RegistryError::Duplicate(declaration.name.to_string()));
            }
            registered.push(RegisteredTool {
                declaration,
                handler,
            });
        }

        // Single source of truth for "tools" schema the LLM sees
        let schemas = Value::Array(registered.iter().map(|t| t.declaration.schema()).collect());
        Ok(Self {
            tools: registered,
            by_name,
            schemas,
        })
    }

    pub fn schemas(&self) -> &Value {
        &self.schemas
    }

    pub fn declarations(&self) -> impl Iterator<Item = &ToolDeclaration> {
        self.tools.iter().map(|t| &t.declaration)
    }

    /// Runs the handler for `call`. Recoverable failures come back as the
    /// result text so the model can see them; anything else is an error.
    pub fn dispatch(&self, resolver: &DataResolver, call: &FunctionCall) -> Result<String, ToolError> {
        let tool = self
            .by_name
            .get(call.name.as_str())
            .map(|&idx| &self.tools[idx])
            .ok_or_else(|| ToolError::UnknownTool(call.name.clone()))?;

        match (tool.handler)(resolver, &call.arguments) {
            Err(e) if e.is_recoverable() => {
                warn!(tool = %call.name, error = %e, "tool call failed, returning error text");
                Ok(e.to_string())
            }
            other => other,
        }
    }
}

fn tool(declaration: ToolDeclaration, handler: ToolHandler) -> (ToolDeclaration, ToolHandler) {
    (declaration, handler)
}

fn builtin_tools() -> Vec<(ToolDeclaration, ToolHandler)> {
    vec![
        tool(
            ToolDeclaration {
                name: "GetCurrentDateTime",
                description: "Get the user's current date and time",
                parameters: None,
            },
            |resolver, _| Ok(resolver.current_date_time()),
        ),
        tool(
            ToolDeclaration {
                name: "GetEmployeesWishesCSV",
                description: "Get the CSV table with employees' wishes (Vārds,Uzvārds,Datums,Dienas tips(Wish),Sākums,Beigas)",
                parameters: None,
            },
            |resolver, _| resolver.read_table(Table::EmployeesWishes),
        ),
        tool(
            ToolDeclaration {
                name: "GetOvertimesCSV",
                description: "Get the CSV table with employees' overtimes (Vārds,Uzvārds,Virsstundu skaits)",
                parameters: None,
            },
            |resolver, _| resolver.read_table(Table::Overtimes),
        ),
        tool(
            ToolDeclaration {
                name: "GetScheduledWeekendsCSV",
                description: "Get the CSV table with employees' scheduled weekends (Vārds,Uzvārds,Datums...)",
                parameters: None,
            },
            |resolver, _| resolver.read_table(Table::ScheduledWeekends),
        ),
        tool(
            ToolDeclaration {
                name: "GetPlanCSV",
                description: "Get the CSV table with employee schedules (Plāns) (Vārds, Uzvārds,Amats,Slodze,Tabeles nr.,Virsstundas,Normas stundas,Stundas,Nakts stundas,Svētku stundas,Saplānotās stundas)",
                parameters: None,
            },
            |resolver, _| resolver.read_table(Table::Plan),
        ),
        tool(
            ToolDeclaration {
                name: "GetAbsencesJSON",
                description: "Get the JSON with employee absences, data is filtered using AND operator, all arguments are optional (Prombūtnes veids,Darbinieka vārds un uzvārds,Darbinieka ID,Prombūtnes datums)",
                parameters: Some(serde_json::json!({
                    "type": "object",
                    "properties": {
                        "typeOfAbsence": {
                            "type": "string",
                            "enum": AbsenceType::TOKENS,
                            "description": "Type of absence"
                        },
                        "employeeName": {
                            "type": "string",
                            "description": "Employee name surname, filtered using 'contains'"
                        },
                        "employeeId": {
                            "type": "string",
                            "description": "Employee ID number (ID-<num>)"
                        },
                        "absenceStartDate": {
                            "type": "string",
                            "description": "Start date of absence, inclusive (yyyy-mm-dd)"
                        },
                        "absenceEndDate": {
                            "type": "string",
                            "description": "End date of absence, inclusive (yyyy-mm-dd)"
                        }
                    },
                    "required": []
                })),
            },
            |resolver, args| resolver.absences(args),
        ),
    ]
}
