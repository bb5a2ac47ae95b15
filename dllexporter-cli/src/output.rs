use std::path::Path;

use anyhow::Context;

/// Printed when the tool is started without arguments.
pub fn print_usage() {
    println!("用法: dllexporter <dll路径> [输出格式: text|json|xml] [输出文件路径]");
    println!("示例: dllexporter MyLibrary.dll json output.json");
    println!("示例: dllexporter MyLibrary.dll text");
    println!("注意: 确保所有非系统依赖的DLL都在目标DLL的同目录下");
}

/// Reports a failed run together with the remediation checklist.
pub fn print_failure(error: &anyhow::Error) {
    println!("错误: {error:#}");
    println!("请确保:");
    println!("1. DLL路径正确");
    println!("2. 所有非系统依赖的DLL都在同一目录下");
    println!("3. 系统依赖项（如System.Private.CoreLib）会自动忽略");
}

/// Printed at the end of every run, failed or not.
pub fn print_completion() {
    println!("处理完成。系统依赖项已自动忽略，无需手动提供。");
}

/// Writes `document` to `path`, replacing an existing file.
pub fn write_export(path: &Path, document: &str) -> anyhow::Result<()> {
    std::fs::write(path, document)
        .with_context(|| format!("failed to write export: {}", path.display()))?;
    println!("结果已导出到: {}", path.display());
    Ok(())
}
