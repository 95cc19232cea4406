use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::ledger::{self, Receipt, TransactionRequest};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "deposit",
            "Deposit money into the account",
            "deposit [amount]",
            cmd_deposit,
        )
        .with_aliases(&["d"]),
        CommandEntry::new(
            "withdraw",
            "Withdraw money from the account",
            "withdraw [amount]",
            cmd_withdraw,
        )
        .with_aliases(&["s"]),
        CommandEntry::new(
            "statement",
            "Show every movement and the current balance",
            "statement",
            cmd_statement,
        )
        .with_aliases(&["e"]),
        CommandEntry::new("balance", "Show the current balance", "balance", cmd_balance),
        CommandEntry::new(
            "limits",
            "Show today's usage of the daily limits",
            "limits",
            cmd_limits,
        ),
    ]
}

fn cmd_deposit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let amount = context.amount_argument(args, "Deposit amount")?;
    apply(context, TransactionRequest::deposit(amount))
}

fn cmd_withdraw(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let amount = context.amount_argument(args, "Withdrawal amount")?;
    apply(context, TransactionRequest::withdrawal(amount))
}

fn apply(context: &mut ShellContext, request: TransactionRequest) -> CommandResult {
    let now = context.now();
    let receipt = ledger::apply(&mut context.account, request, now)?;
    report_receipt(context, &receipt);
    Ok(())
}

fn report_receipt(context: &ShellContext, receipt: &Receipt) {
    let currency = &context.config.currency;
    output::success(format!(
        "{} of {} completed.",
        receipt.kind(),
        currency.format_amount(receipt.amount())
    ));
    output::info(format!("Balance: {}", currency.format_amount(receipt.balance)));
}

fn cmd_statement(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    no_arguments("statement", args)?;
    let statement = ledger::generate_statement(&context.account, &context.config.currency);
    output::section(&statement.title);
    for line in &statement.lines {
        output::info(line);
    }
    output::separator();
    Ok(())
}

fn cmd_balance(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    no_arguments("balance", args)?;
    output::info(format!(
        "Balance: {}",
        context.config.currency.format_amount(context.account.balance())
    ));
    Ok(())
}

fn cmd_limits(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    no_arguments("limits", args)?;
    let now = context.now();
    let account = &context.account;
    let policy = account.policy();
    let usage = account.daily_usage(now);
    output::info(format!(
        "Withdrawals today: {}/{}",
        usage.withdrawals, policy.max_withdrawals_per_day
    ));
    output::info(format!(
        "Transactions today: {}/{}",
        usage.transactions, policy.max_transactions_per_day
    ));
    output::info(format!(
        "Per-withdrawal limit: {}",
        context
            .config
            .currency
            .format_amount(policy.withdrawal_limit_per_operation)
    ));
    if let Some(countdown) = account.time_until_reset(now) {
        output::info(format!("Limits reset in {}.", countdown));
    }
    Ok(())
}

fn no_arguments(command: &str, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        Ok(())
    } else {
        Err(CommandError::InvalidArguments(format!("usage: {}", command)))
    }
}
