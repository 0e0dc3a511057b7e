// Copyright (c) 2025 Famledger.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command};

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .value_name("YYYY-MM")
        .help("Month to operate on (defaults to the current month)")
}

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

pub fn build_cli() -> Command {
    Command::new("famledger")
        .about("Family budgeting: monthly plans, expense tracking, and a spreadsheet mirror")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Initialize the database and print its location"))
        .subcommand(
            Command::new("login")
                .about("Log in as one of the household profiles")
                .arg(Arg::new("user").required(true))
                .arg(Arg::new("password").required(true)),
        )
        .subcommand(Command::new("logout").about("Clear the active profile"))
        .subcommand(Command::new("whoami").about("Show the active profile"))
        .subcommand(
            Command::new("tx")
                .about("Record and manage expense transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record an expense (written to the ledger, mirrored to the sheet)")
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .value_name("YYYY-MM-DD")
                                .help("Date of the expense (defaults to today)"),
                        )
                        .arg(
                            Arg::new("description")
                                .long("desc")
                                .required(true)
                                .help("What the money went to"),
                        )
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .required(true)
                                .help("Budget category name"),
                        )
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .help("Spending amount (non-negative)"),
                        ),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Edit an existing expense")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(clap::value_parser!(i64)),
                        )
                        .arg(Arg::new("date").long("date").value_name("YYYY-MM-DD"))
                        .arg(Arg::new("description").long("desc"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("amount").long("amount")),
                )
                .subcommand(
                    Command::new("rm").about("Delete an expense").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(clap::value_parser!(i64)),
                    ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List expenses")
                        .arg(month_arg())
                        .arg(Arg::new("category").long("category").help("Filter by category"))
                        .arg(
                            Arg::new("search")
                                .long("search")
                                .value_name("PATTERN")
                                .help("Filter descriptions by regex"),
                        ),
                )),
        )
        .subcommand(
            Command::new("budget")
                .about("Maintain the monthly budget plan")
                .subcommand(Command::new("show").about("Show the plan for a month").arg(month_arg()))
                .subcommand(
                    Command::new("add-income")
                        .about("Add a planned income source")
                        .arg(Arg::new("source").required(true))
                        .arg(Arg::new("amount").required(true))
                        .arg(month_arg()),
                )
                .subcommand(
                    Command::new("rm-income")
                        .about("Remove a planned income source by name")
                        .arg(Arg::new("source").required(true))
                        .arg(month_arg()),
                )
                .subcommand(
                    Command::new("add-saving")
                        .about("Add a savings goal")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("amount").required(true))
                        .arg(month_arg()),
                )
                .subcommand(
                    Command::new("rm-saving")
                        .about("Remove a savings goal by name")
                        .arg(Arg::new("name").required(true))
                        .arg(month_arg()),
                )
                .subcommand(
                    Command::new("add-category")
                        .about("Add a spending category allocation")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("allocation").required(true))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .value_parser(["need", "want"])
                                .default_value("need")
                                .help("Need or Want"),
                        )
                        .arg(month_arg()),
                )
                .subcommand(
                    Command::new("rm-category")
                        .about("Remove a category allocation by name")
                        .arg(Arg::new("name").required(true))
                        .arg(month_arg()),
                )
                .subcommand(
                    Command::new("copy-previous")
                        .about("Reuse the previous month's plan for a month")
                        .arg(month_arg()),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Dashboard views")
                .subcommand(json_flags(
                    Command::new("summary")
                        .about("Carried-over balance, income, spending, and remainder for a month")
                        .arg(month_arg()),
                ))
                .subcommand(json_flags(
                    Command::new("categories")
                        .about("Allocation vs. realization per category")
                        .arg(month_arg()),
                ))
                .subcommand(json_flags(
                    Command::new("daily")
                        .about("Spending per day within a month")
                        .arg(month_arg()),
                ))
                .subcommand(json_flags(
                    Command::new("trend")
                        .about("Monthly spending trend")
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .value_parser(clap::value_parser!(usize))
                                .help("How many trailing months to show (default 6)"),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("balances").about("Cumulative balance per month"),
                )),
        )
        .subcommand(
            Command::new("export").about("Export reports").subcommand(
                Command::new("month")
                    .about("Export one month's report (summary block plus transactions)")
                    .arg(month_arg())
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .value_parser(["csv", "json"])
                            .default_value("csv"),
                    )
                    .arg(Arg::new("out").long("out").required(true).value_name("FILE")),
            ),
        )
        .subcommand(
            Command::new("mirror")
                .about("Configure the spreadsheet mirror")
                .subcommand(
                    Command::new("use-http")
                        .about("Mirror to remote sheet endpoints under a base URL")
                        .arg(Arg::new("url").required(true)),
                )
                .subcommand(
                    Command::new("use-sheet")
                        .about("Mirror to a local CSV sheet file")
                        .arg(Arg::new("path").required(true)),
                )
                .subcommand(Command::new("show").about("Show the configured mirror")),
        )
        .subcommand(
            Command::new("doctor")
                .about("Report divergence between the ledger and a readable mirror"),
        )
}
