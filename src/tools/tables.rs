/// The CSV tables exposed to the model as-is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Table {
    EmployeesWishes,
    Overtimes,
    ScheduledWeekends,
    Plan,
}

impl Table {
    pub fn file_name(self) -> &'static str {
        match self {
            Table::EmployeesWishes => "employees_wishes.csv",
            Table::Overtimes => "overtimes.csv",
            Table::ScheduledWeekends => "scheduled_weekends.csv",
            Table::Plan => "plan.csv",
        }
    }
}
